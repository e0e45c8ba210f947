use json_wiregen::xcontent::{Params, XContentBuilder};
use proptest::prelude::*;
use xcontent_compat::domain::{Build, BuildFlavor, BuildType, MainResponse};
use xcontent_compat::rest::{self, CompatibleVersion};
use xcontent_compat::{v7, v8};

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![any::<String>(), r#"["\\\n\t\x00-\x1fa-z0-9.é漢😀]{0,16}"#]
}

fn arb_flavor() -> impl Strategy<Value = BuildFlavor> {
    prop_oneof![Just(BuildFlavor::Default), Just(BuildFlavor::Oss), Just(BuildFlavor::Unknown)]
}

fn arb_kind() -> impl Strategy<Value = BuildType> {
    prop_oneof![
        Just(BuildType::Deb),
        Just(BuildType::Rpm),
        Just(BuildType::Docker),
        Just(BuildType::Tar),
        Just(BuildType::Zip),
        Just(BuildType::Unknown),
    ]
}

prop_compose! {
    fn arb_build()
        (
            version in arb_text(),
            flavor in arb_flavor(),
            kind in arb_kind(),
            hash in arb_text(),
            date in arb_text(),
            snapshot in any::<bool>(),
            lucene_version in arb_text(),
            minimum_wire_compatibility_version in arb_text(),
            minimum_index_compatibility_version in arb_text()
        )
        -> Build
    {
        Build {
            version,
            flavor,
            kind,
            hash,
            date,
            snapshot,
            lucene_version,
            minimum_wire_compatibility_version,
            minimum_index_compatibility_version,
        }
    }
}

prop_compose! {
    fn arb_response()
        (node_name in arb_text(), cluster_name in arb_text(), cluster_uuid in arb_text(), build in arb_build())
        -> MainResponse
    {
        MainResponse { node_name, cluster_name, cluster_uuid, build }
    }
}

fn without_kind(mut resp: MainResponse) -> MainResponse {
    resp.build.kind = BuildType::Unknown;
    resp
}

proptest! {
    #[test]
    fn v8_wire_model_round_trips_any_response(resp in arb_response()) {
        prop_assert_eq!(v8::from_wire(v8::to_wire(&resp)), resp.clone());

        let mut builder = XContentBuilder::new();
        rest::to_x_content(&resp, &mut builder, &Params::empty()).unwrap();
        let value = builder.finish().unwrap();
        prop_assert_eq!(rest::from_x_content(&value, CompatibleVersion::V8).unwrap(), resp);
    }

    #[test]
    fn v7_wire_model_round_trips_all_but_build_type(resp in arb_response()) {
        prop_assert_eq!(v7::from_wire(v7::to_wire(&resp)), without_kind(resp.clone()));

        let params = Params::empty().with(CompatibleVersion::PARAM, "7");
        let text = rest::render(&resp, &params).unwrap();
        prop_assert_eq!(rest::parse(&text, CompatibleVersion::V7).unwrap(), without_kind(resp));
    }

    #[test]
    fn json_text_round_trips_on_the_current_version(resp in arb_response()) {
        let text = rest::render(&resp, &Params::empty().with("pretty", "true")).unwrap();
        prop_assert_eq!(rest::parse(&text, CompatibleVersion::CURRENT).unwrap(), resp);
    }
}
