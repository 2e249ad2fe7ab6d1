//! Light classification
//!
//! Only the declared type and the LightAPI capability are consulted.

use crate::scene::{ApiSchemas, PrimType, SceneGraph, ScenePath};

/// Whether the prim emits light
///
/// True for any type in the light family, and for untyped / base-typed prims
/// that have LightAPI applied. Missing prims are not lights.
pub fn is_light<S: SceneGraph + ?Sized>(scene: &S, path: &ScenePath) -> bool {
    match scene.prim_type(path) {
        Some(prim_type) if prim_type.is_light_family() => true,
        Some(prim_type) if prim_type.is_base() => scene.has_api(path, ApiSchemas::LIGHT),
        _ => false,
    }
}

/// Whether the prim is a light filter
pub fn is_light_filter<S: SceneGraph + ?Sized>(scene: &S, path: &ScenePath) -> bool {
    scene
        .prim_type(path)
        .is_some_and(|prim_type| *prim_type == PrimType::LightFilter)
}

/// Whether the prim belongs in a light list (light or light filter)
pub fn is_light_or_filter<S: SceneGraph + ?Sized>(scene: &S, path: &ScenePath) -> bool {
    is_light(scene, path) || is_light_filter(scene, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Stage;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_typed_lights() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/sun"), PrimType::DistantLight).unwrap();
        stage.define_prim(&p("/env"), PrimType::DomeLight).unwrap();

        assert!(is_light(&stage, &p("/sun")));
        assert!(is_light(&stage, &p("/env")));
        assert!(!is_light_filter(&stage, &p("/sun")));
    }

    #[test]
    fn test_light_api_on_base_types() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/untyped"), PrimType::Untyped).unwrap();
        stage.define_prim(&p("/group"), PrimType::Xform).unwrap();
        stage.define_prim(&p("/mesh"), PrimType::Mesh).unwrap();

        assert!(!is_light(&stage, &p("/untyped")));

        for path in ["/untyped", "/group", "/mesh"] {
            stage.apply_api(&p(path), ApiSchemas::LIGHT).unwrap();
        }
        assert!(is_light(&stage, &p("/untyped")));
        assert!(is_light(&stage, &p("/group")));
        assert!(!is_light(&stage, &p("/mesh")));
    }

    #[test]
    fn test_filters_and_missing_prims() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/filter"), PrimType::LightFilter).unwrap();

        assert!(is_light_filter(&stage, &p("/filter")));
        assert!(!is_light(&stage, &p("/filter")));
        assert!(is_light_or_filter(&stage, &p("/filter")));
        assert!(!is_light_or_filter(&stage, &p("/missing")));
    }

    #[test]
    fn test_light_list_api_is_not_light() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/World"), PrimType::Xform).unwrap();
        stage.apply_api(&p("/World"), ApiSchemas::LIGHT_LIST).unwrap();
        assert!(!is_light_or_filter(&stage, &p("/World")));
    }
}
