use serde_json::{Map, Value};

use super::{Params, ToXContent, XContentError};

enum Frame {
    Object { map: Map<String, Value>, pending: Option<String> },
    Array(Vec<Value>),
}

/// Stack-framed JSON writer. Objects keep insertion order.
#[derive(Default)]
pub struct XContentBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl XContentBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn start_object(&mut self) -> Result<(), XContentError> {
        self.check_writable()?;
        self.stack.push(Frame::Object { map: Map::new(), pending: None });
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), XContentError> {
        match self.stack.pop() {
            Some(Frame::Object { map, pending: None }) => self.attach(Value::Object(map)),
            Some(Frame::Object { pending: Some(name), .. }) => {
                Err(framing(format!("field [{name}] has no value")))
            }
            Some(Frame::Array(_)) => Err(framing("end_object inside an array")),
            None => Err(framing("end_object without start_object")),
        }
    }

    pub fn start_array(&mut self) -> Result<(), XContentError> {
        self.check_writable()?;
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<(), XContentError> {
        match self.stack.pop() {
            Some(Frame::Array(xs)) => self.attach(Value::Array(xs)),
            Some(Frame::Object { .. }) => Err(framing("end_array inside an object")),
            None => Err(framing("end_array without start_array")),
        }
    }

    pub fn field_name(&mut self, name: &str) -> Result<(), XContentError> {
        match self.stack.last_mut() {
            Some(Frame::Object { map, pending }) => {
                if let Some(prev) = pending {
                    return Err(framing(format!("field [{prev}] has no value")));
                }
                if map.contains_key(name) {
                    return Err(framing(format!("duplicate field [{name}]")));
                }
                *pending = Some(name.to_string());
                Ok(())
            }
            _ => Err(framing(format!("field [{name}] outside of an object"))),
        }
    }

    pub fn value(&mut self, value: Value) -> Result<(), XContentError> {
        self.check_writable()?;
        self.attach(value)
    }

    /// Field name followed by the value's own serializer.
    pub fn field<T: ToXContent + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
        params: &Params,
    ) -> Result<(), XContentError> {
        self.field_name(name)?;
        value.to_x_content(self, params)
    }

    pub fn finish(self) -> Result<Value, XContentError> {
        if !self.stack.is_empty() {
            return Err(framing(format!("{} unclosed frame(s)", self.stack.len())));
        }
        self.root.ok_or_else(|| framing("nothing was written"))
    }

    fn check_writable(&self) -> Result<(), XContentError> {
        match self.stack.last() {
            None if self.root.is_some() => Err(framing("document is already complete")),
            Some(Frame::Object { pending: None, .. }) => Err(framing("value without a field name")),
            _ => Ok(()),
        }
    }

    fn attach(&mut self, value: Value) -> Result<(), XContentError> {
        match self.stack.last_mut() {
            None => {
                self.root = Some(value);
                Ok(())
            }
            Some(Frame::Array(xs)) => {
                xs.push(value);
                Ok(())
            }
            Some(Frame::Object { map, pending }) => match pending.take() {
                Some(name) => {
                    map.insert(name, value);
                    Ok(())
                }
                None => Err(framing("value without a field name")),
            },
        }
    }
}

fn framing(msg: impl Into<String>) -> XContentError { XContentError::Framing(msg.into()) }

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_and_arrays() {
        let mut b = XContentBuilder::new();
        b.start_object().unwrap();
        b.field_name("z").unwrap();
        b.value(json!(1)).unwrap();
        b.field_name("a").unwrap();
        b.start_array().unwrap();
        b.start_object().unwrap();
        b.field("k", &true, &Params::empty()).unwrap();
        b.end_object().unwrap();
        b.end_array().unwrap();
        b.end_object().unwrap();
        let v = b.finish().unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"z":1,"a":[{"k":true}]}"#);
    }

    #[test]
    fn framing_misuse_is_an_error() {
        let mut b = XContentBuilder::new();
        assert!(b.end_object().is_err());

        let mut b = XContentBuilder::new();
        b.start_object().unwrap();
        assert!(b.value(json!(1)).is_err(), "value needs a field name");
        b.field_name("a").unwrap();
        assert!(b.field_name("b").is_err(), "pending field");
        assert!(b.end_object().is_err());

        let mut b = XContentBuilder::new();
        b.start_object().unwrap();
        b.field("a", &true, &Params::empty()).unwrap();
        assert!(b.field_name("a").is_err(), "duplicate");

        let mut b = XContentBuilder::new();
        b.start_array().unwrap();
        assert!(b.finish().is_err(), "unclosed");

        let mut b = XContentBuilder::new();
        b.value(json!("x")).unwrap();
        assert!(b.value(json!("y")).is_err(), "second root");
        assert!(XContentBuilder::new().finish().is_err());
    }
}
