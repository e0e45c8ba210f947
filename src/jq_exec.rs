//! Optional jq pre-filter over a schema document, via jaq.
use anyhow::{Result, anyhow};
use jaq_core::{Compiler, Ctx, RcIter, load};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; every output becomes one JSON document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(|errs| {
        let msgs: Vec<String> = errs.iter().map(|(_, err)| format!("parse error: {err:?}")).collect();
        anyhow!(msgs.join("; "))
    })?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            let msgs: Vec<String> = errs
                .iter()
                .flat_map(|(_, undefined)| {
                    undefined.iter().map(|(name, undef)| format!("undefined `{name}`: {undef:?}"))
                })
                .collect();
            anyhow!(msgs.join("; "))
        })?;

    let inputs = RcIter::new(core::iter::empty());
    let mut out = Vec::new();
    for item in filter.run((Ctx::new([], &inputs), Val::from(input.clone()))) {
        let v = item.map_err(|e| anyhow!("{e:?}"))?;
        // Val's Display is JSON text; re-parse to keep key order
        out.push(serde_json::from_str(&v.to_string())?);
    }
    Ok(out)
}
