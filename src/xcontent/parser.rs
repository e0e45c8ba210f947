use std::collections::HashMap;

use serde_json::Value;

use super::{FromXContent, XContentError};
use crate::classify::kind_of;

type Ctor<T> = Box<dyn Fn(&mut Args<'_>) -> Result<T, XContentError> + Send + Sync>;

/// Positional constructing-parser.
///
/// Wire values are collected into slots indexed by declared position and
/// passed to a single constructor. Fields are declared append-only: position
/// `n` must be declared `n`-th, so the slot order cannot drift from the
/// constructor's parameter order.
pub struct ConstructingObjectParser<T> {
    name: String,
    arity: usize,
    fields: Vec<String>,
    positions: HashMap<String, usize>,
    ctor: Ctor<T>,
}

impl<T> ConstructingObjectParser<T> {
    pub fn new<F>(name: impl Into<String>, arity: usize, ctor: F) -> Self
    where
        F: Fn(&mut Args<'_>) -> Result<T, XContentError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            fields: Vec::with_capacity(arity),
            positions: HashMap::with_capacity(arity),
            ctor: Box::new(ctor),
        }
    }

    /// Panics when `position` is not the next free slot or `wire_name` is
    /// already declared: both mean the generator emitted a broken parser.
    pub fn declare_field(mut self, position: usize, wire_name: &str) -> Self {
        assert_eq!(
            position,
            self.fields.len(),
            "parser [{}]: field [{wire_name}] declared at position {position} out of order",
            self.name
        );
        let prev = self.positions.insert(wire_name.to_string(), position);
        assert!(prev.is_none(), "parser [{}]: field [{wire_name}] declared twice", self.name);
        self.fields.push(wire_name.to_string());
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn field_names(&self) -> impl Iterator<Item = &str> { self.fields.iter().map(String::as_str) }

    pub fn parse(&self, value: &Value) -> Result<T, XContentError> {
        assert_eq!(
            self.fields.len(),
            self.arity,
            "parser [{}]: {} fields declared for a {}-argument constructor",
            self.name,
            self.fields.len(),
            self.arity
        );
        let Value::Object(map) = value else {
            return Err(XContentError::UnexpectedToken { expected: "object", found: kind_of(value) });
        };
        let mut slots: Vec<Option<&Value>> = vec![None; self.arity];
        for (key, v) in map {
            match self.positions.get(key.as_str()) {
                Some(&position) => slots[position] = Some(v),
                None => tracing::trace!(object = %self.name, field = %key, "ignoring unknown field"),
            }
        }
        let mut args = Args { object: &self.name, names: &self.fields, slots };
        (self.ctor)(&mut args)
    }
}

/// Positional view of one parsed object, handed to the constructor closure.
pub struct Args<'a> {
    object: &'a str,
    names: &'a [String],
    slots: Vec<Option<&'a Value>>,
}

impl Args<'_> {
    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    pub fn is_present(&self, position: usize) -> bool {
        self.slots.get(position).is_some_and(Option::is_some)
    }

    pub fn take<V: FromXContent>(&mut self, position: usize) -> Result<V, XContentError> {
        let field = &self.names[position];
        match self.slots[position].take() {
            None => Err(XContentError::MissingField {
                object: self.object.to_string(),
                field: field.clone(),
            }),
            Some(v) => V::from_x_content(v).map_err(|e| XContentError::Field {
                object: self.object.to_string(),
                field: field.clone(),
                source: Box::new(e),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair() -> ConstructingObjectParser<(String, bool)> {
        ConstructingObjectParser::new("pair", 2, |args| Ok((args.take(0)?, args.take(1)?)))
            .declare_field(0, "left")
            .declare_field(1, "right")
    }

    #[test]
    fn positions_follow_declaration() {
        let p = pair();
        assert_eq!(p.field_names().collect::<Vec<_>>(), vec!["left", "right"]);
        let v = p.parse(&json!({"right": true, "left": "l"})).unwrap();
        assert_eq!(v, ("l".to_string(), true));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = pair().parse(&json!([1])).unwrap_err();
        assert_eq!(err, XContentError::UnexpectedToken { expected: "object", found: "array" });
    }

    #[test]
    fn presence_is_visible_to_the_constructor() {
        let p = ConstructingObjectParser::new("opt", 1, |args| Ok(args.is_present(0)))
            .declare_field(0, "x");
        assert!(p.parse(&json!({"x": 1})).unwrap());
        assert!(!p.parse(&json!({})).unwrap());
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn out_of_order_declaration_panics() {
        let _ = ConstructingObjectParser::new("bad", 2, |args| Ok((args.take::<bool>(0)?, args.take::<bool>(1)?)))
            .declare_field(1, "b");
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn duplicate_declaration_panics() {
        let _ = ConstructingObjectParser::new("bad", 2, |args| Ok((args.take::<bool>(0)?, args.take::<bool>(1)?)))
            .declare_field(0, "a")
            .declare_field(1, "a");
    }

    #[test]
    #[should_panic(expected = "fields declared")]
    fn arity_mismatch_panics_on_parse() {
        let p = ConstructingObjectParser::new("short", 2, |args| Ok(args.take::<bool>(0)?))
            .declare_field(0, "a");
        let _ = p.parse(&json!({"a": true}));
    }
}
