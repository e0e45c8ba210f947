//! Version-agnostic domain objects for the node info response.

pub const TAGLINE: &str = "You Know, for Search";

/// Placeholder for build metadata a peer did not send.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildFlavor {
    Default,
    Oss,
    /// Any flavor this version does not know about.
    Unknown,
}

impl BuildFlavor {
    pub fn as_wire(self) -> &'static str {
        match self {
            BuildFlavor::Default => "default",
            BuildFlavor::Oss => "oss",
            BuildFlavor::Unknown => UNKNOWN,
        }
    }

    /// Never fails: unrecognized values become [`BuildFlavor::Unknown`].
    pub fn from_wire(s: &str) -> Self {
        match s {
            "default" => BuildFlavor::Default,
            "oss" => BuildFlavor::Oss,
            other => {
                if other != UNKNOWN {
                    tracing::debug!(flavor = %other, "unrecognized build flavor");
                }
                BuildFlavor::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Deb,
    Rpm,
    Docker,
    Tar,
    Zip,
    Unknown,
}

impl BuildType {
    pub fn as_wire(self) -> &'static str {
        match self {
            BuildType::Deb => "deb",
            BuildType::Rpm => "rpm",
            BuildType::Docker => "docker",
            BuildType::Tar => "tar",
            BuildType::Zip => "zip",
            BuildType::Unknown => UNKNOWN,
        }
    }

    pub fn from_wire(s: &str) -> Self {
        match s {
            "deb" => BuildType::Deb,
            "rpm" => BuildType::Rpm,
            "docker" => BuildType::Docker,
            "tar" => BuildType::Tar,
            "zip" => BuildType::Zip,
            other => {
                if other != UNKNOWN {
                    tracing::debug!(build_type = %other, "unrecognized build type");
                }
                BuildType::Unknown
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub version: String,
    pub flavor: BuildFlavor,
    pub kind: BuildType,
    pub hash: String,
    pub date: String,
    pub snapshot: bool,
    pub lucene_version: String,
    pub minimum_wire_compatibility_version: String,
    pub minimum_index_compatibility_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainResponse {
    pub node_name: String,
    pub cluster_name: String,
    pub cluster_uuid: String,
    pub build: Build,
}

impl MainResponse {
    /// Dotted paths of every domain leaf field; adapters must map or drop each.
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "node_name",
        "cluster_name",
        "cluster_uuid",
        "build.version",
        "build.flavor",
        "build.kind",
        "build.hash",
        "build.date",
        "build.snapshot",
        "build.lucene_version",
        "build.minimum_wire_compatibility_version",
        "build.minimum_index_compatibility_version",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_decoding_is_lenient() {
        assert_eq!(BuildFlavor::from_wire("default"), BuildFlavor::Default);
        assert_eq!(BuildFlavor::from_wire("futuristic"), BuildFlavor::Unknown);
        assert_eq!(BuildType::from_wire("docker"), BuildType::Docker);
        assert_eq!(BuildType::from_wire("appimage"), BuildType::Unknown);
        assert_eq!(BuildType::from_wire(""), BuildType::Unknown);
    }

    #[test]
    fn known_values_survive_the_wire() {
        for flavor in [BuildFlavor::Default, BuildFlavor::Oss, BuildFlavor::Unknown] {
            assert_eq!(BuildFlavor::from_wire(flavor.as_wire()), flavor);
        }
        for kind in [BuildType::Deb, BuildType::Rpm, BuildType::Docker, BuildType::Tar, BuildType::Zip, BuildType::Unknown] {
            assert_eq!(BuildType::from_wire(kind.as_wire()), kind);
        }
    }
}
