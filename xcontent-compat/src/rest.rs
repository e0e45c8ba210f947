//! Version negotiation for the node info response.
//!
//! A caller asks for an older wire format with the `compatible_with`
//! request parameter; without it the current format is written.
use json_wiregen::xcontent::{self, FromXContent, Params, ToXContent, Value, XContentBuilder};

use crate::adapter::{AdapterError, AdapterMapping};
use crate::domain::MainResponse;
use crate::{v7, v8, wire};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompatibleVersion {
    V7,
    V8,
}

impl CompatibleVersion {
    pub const CURRENT: CompatibleVersion = CompatibleVersion::V8;

    /// Request parameter naming the wire major version.
    pub const PARAM: &'static str = "compatible_with";

    pub fn parse(raw: &str) -> Result<Self, AdapterError> {
        match raw.trim() {
            "7" => Ok(CompatibleVersion::V7),
            "8" => Ok(CompatibleVersion::V8),
            other => Err(AdapterError::UnsupportedVersion(other.to_string())),
        }
    }

    pub fn from_params(params: &Params) -> Result<Self, AdapterError> {
        match params.get(Self::PARAM) {
            None => Ok(Self::CURRENT),
            Some(raw) => Self::parse(raw),
        }
    }

    pub fn major(self) -> u8 {
        match self {
            CompatibleVersion::V7 => 7,
            CompatibleVersion::V8 => 8,
        }
    }

    pub fn mapping(self) -> &'static AdapterMapping {
        match self {
            CompatibleVersion::V7 => &v7::MAPPING,
            CompatibleVersion::V8 => &v8::MAPPING,
        }
    }

    /// Dotted paths of the generated wire model's fields.
    pub fn wire_fields(self) -> Vec<String> {
        match self {
            CompatibleVersion::V7 => v7::wire_fields(),
            CompatibleVersion::V8 => v8::wire_fields(),
        }
    }
}

/// Writes `response` in the wire format `params` selects.
pub fn to_x_content(
    response: &MainResponse,
    builder: &mut XContentBuilder,
    params: &Params,
) -> Result<(), AdapterError> {
    let version = CompatibleVersion::from_params(params)?;
    tracing::trace!(version = version.major(), "writing main response");
    match version {
        CompatibleVersion::V7 => v7::to_wire(response).to_x_content(builder, params)?,
        CompatibleVersion::V8 => v8::to_wire(response).to_x_content(builder, params)?,
    }
    Ok(())
}

/// Reads a payload written by a peer speaking `version`.
///
/// Missing fields are filled from the version's leniency table first, so
/// the generated parser only ever sees complete payloads.
pub fn from_x_content(payload: &Value, version: CompatibleVersion) -> Result<MainResponse, AdapterError> {
    let mut payload = payload.clone();
    version.mapping().apply_leniency(&mut payload)?;
    let response = match version {
        CompatibleVersion::V7 => v7::from_wire(wire::v7::MainResponse::from_x_content(&payload)?),
        CompatibleVersion::V8 => v8::from_wire(wire::v8::MainResponse::from_x_content(&payload)?),
    };
    Ok(response)
}

/// Serializes `response` to a JSON string; `pretty=true` indents.
pub fn render(response: &MainResponse, params: &Params) -> Result<String, AdapterError> {
    let mut builder = XContentBuilder::new();
    to_x_content(response, &mut builder, params)?;
    let value = builder.finish()?;
    let out = if params.get_bool("pretty", false) {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    out.map_err(|e| AdapterError::Wire(xcontent::XContentError::Json(e.to_string())))
}

/// Parses a JSON string from a peer speaking `version`.
pub fn parse(src: &str, version: CompatibleVersion) -> Result<MainResponse, AdapterError> {
    let value: Value =
        serde_json::from_str(src).map_err(|e| AdapterError::Wire(xcontent::XContentError::Json(e.to_string())))?;
    from_x_content(&value, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_comes_from_params() {
        assert_eq!(CompatibleVersion::from_params(&Params::empty()).unwrap(), CompatibleVersion::V8);
        let p = Params::empty().with(CompatibleVersion::PARAM, "7");
        assert_eq!(CompatibleVersion::from_params(&p).unwrap(), CompatibleVersion::V7);
        let p = Params::empty().with(CompatibleVersion::PARAM, "6");
        assert_eq!(
            CompatibleVersion::from_params(&p).unwrap_err(),
            AdapterError::UnsupportedVersion("6".into())
        );
    }

    #[test]
    fn mappings_carry_their_version() {
        for v in [CompatibleVersion::V7, CompatibleVersion::V8] {
            assert_eq!(v.mapping().version, v.major());
        }
    }
}
