//! End-to-end light-list behaviour on the torches scene

use super::{CacheState, ComputeMode, InvalidRootReason, LightList, LightListError, LuxScene};
use crate::scene::{ApiSchemas, LoadPolicy, PrimType, SceneDescription, ScenePath};

const TORCHES: &str = include_str!("../../../../scenes/torches.ron");

const IGNORE: ComputeMode = ComputeMode::IgnoreCache;
const CONSULT: ComputeMode = ComputeMode::ConsultModelHierarchyCache;

fn p(text: &str) -> ScenePath {
    ScenePath::parse(text).unwrap()
}

fn torches(policy: LoadPolicy) -> LuxScene {
    let desc: SceneDescription = ron::from_str(TORCHES).unwrap();
    LuxScene::from_description(&desc, policy).unwrap()
}

fn count(scene: &LuxScene, mode: ComputeMode) -> usize {
    scene.compute_light_list(&p("/World"), mode).unwrap().len()
}

fn paths(list: &LightList) -> Vec<&str> {
    list.iter().map(ScenePath::as_str).collect()
}

#[test]
fn test_torches_walkthrough() {
    crate::foundation::logging::init_for_tests();
    let world = p("/World");
    let mut scene = torches(LoadPolicy::None);

    // Only the sky light is reachable live; torch_2 publishes its light
    assert_eq!(count(&scene, IGNORE), 1);
    assert_eq!(
        paths(&scene.compute_light_list(&world, CONSULT).unwrap()),
        vec!["/World/Lights/Sky_light", "/World/Geo/torch_2/light"]
    );

    scene.load(&world).unwrap();
    assert_eq!(count(&scene, CONSULT), 2);
    let live = scene.compute_light_list(&world, IGNORE).unwrap();
    assert_eq!(
        paths(&live),
        vec!["/World/Lights/Sky_light", "/World/Geo/torch_1/light", "/World/Geo/torch_2/light"]
    );

    scene.store_light_list(&world, live).unwrap();
    assert_eq!(count(&scene, CONSULT), 3);

    scene.set_active(&p("/World/Geo/torch_1"), false).unwrap();
    assert_eq!(count(&scene, IGNORE), 2);
    assert_eq!(count(&scene, CONSULT), 3);
    scene.invalidate_light_list(&world).unwrap();
    assert_eq!(count(&scene, CONSULT), 2);

    scene.define_prim(&p("/World/Lights/TestFilter"), PrimType::LightFilter).unwrap();
    assert_eq!(count(&scene, IGNORE), 3);

    let plain = p("/World/Lights/PrimWithLightAPI");
    scene.define_prim(&plain, PrimType::Untyped).unwrap();
    assert_eq!(count(&scene, IGNORE), 3);
    scene.apply_api(&plain, ApiSchemas::LIGHT).unwrap();
    assert_eq!(count(&scene, IGNORE), 4);
    assert_eq!(scene.cache().state(&world), CacheState::Stale);
}

#[test]
fn test_stored_root_list_survives_unload() {
    let world = p("/World");
    let mut scene = torches(LoadPolicy::All);
    let live = scene.compute_light_list(&world, IGNORE).unwrap();
    scene.store_light_list(&world, live.clone()).unwrap();

    scene.unload(&world).unwrap();
    assert_eq!(count(&scene, IGNORE), 1);
    assert_eq!(scene.compute_light_list(&world, CONSULT).unwrap(), live);
}

#[test]
fn test_ignore_mode_is_independent_of_cache_contents() {
    let world = p("/World");
    let mut scene = torches(LoadPolicy::None);
    let before = scene.compute_light_list(&world, IGNORE).unwrap();

    scene
        .store_light_list(&world, vec![p("/World/Geo/torch_1/light"), p("/Nowhere/light")])
        .unwrap();
    scene.store_light_list(&p("/World/Geo/torch_1"), vec![p("/World/Geo/torch_1/light")]).unwrap();
    assert_eq!(scene.compute_light_list(&world, IGNORE).unwrap(), before);

    scene.invalidate_light_list(&p("/World/Geo/torch_2")).unwrap();
    assert_eq!(scene.compute_light_list(&world, IGNORE).unwrap(), before);
}

#[test]
fn test_consult_never_returns_fewer_with_valid_caches() {
    for policy in [LoadPolicy::None, LoadPolicy::All] {
        let mut scene = torches(policy);
        scene
            .store_light_list(&p("/World/Geo/torch_1"), vec![p("/World/Geo/torch_1/light")])
            .unwrap();
        let live = scene.compute_light_list(&p("/World"), IGNORE).unwrap();
        scene.store_light_list(&p("/World"), live).unwrap();

        assert!(count(&scene, CONSULT) >= count(&scene, IGNORE), "{policy:?}");
    }
}

#[test]
fn test_invalidated_boundary_falls_back_to_live() {
    let torch = p("/World/Geo/torch_2");
    let mut scene = torches(LoadPolicy::None);
    assert_eq!(count(&scene, CONSULT), 2);

    scene.invalidate_light_list(&torch).unwrap();
    assert_eq!(
        scene.compute_light_list(&p("/World"), CONSULT).unwrap(),
        scene.compute_light_list(&p("/World"), IGNORE).unwrap()
    );
    assert_eq!(scene.light_list_rel(&torch).unwrap().len(), 1);

    scene.store_light_list(&torch, vec![p("/World/Geo/torch_2/light")]).unwrap();
    assert_eq!(count(&scene, CONSULT), 2);
}

#[test]
fn test_store_then_rel_is_exact() {
    let world = p("/World");
    let mut scene = torches(LoadPolicy::None);
    let first = vec![p("/A/light"), p("/B/light")];
    let second = vec![p("/B/light")];

    scene.store_light_list(&world, first.clone()).unwrap();
    assert_eq!(scene.light_list_rel(&world).unwrap().into_iter().collect::<Vec<_>>(), first);

    scene.invalidate_light_list(&world).unwrap();
    scene.store_light_list(&world, second.clone()).unwrap();
    assert_eq!(scene.light_list_rel(&world).unwrap().into_iter().collect::<Vec<_>>(), second);
    assert_eq!(scene.cache().state(&world), CacheState::Valid);
}

#[test]
fn test_deactivation_reaches_consult_only_after_invalidate() {
    let world = p("/World");
    let mut scene = torches(LoadPolicy::All);
    let live = scene.compute_light_list(&world, IGNORE).unwrap();
    scene.store_light_list(&world, live).unwrap();

    scene.set_active(&p("/World/Lights"), false).unwrap();
    let ignore = scene.compute_light_list(&world, IGNORE).unwrap();
    assert!(!ignore.contains(&p("/World/Lights/Sky_light")));
    assert!(scene
        .compute_light_list(&world, CONSULT)
        .unwrap()
        .contains(&p("/World/Lights/Sky_light")));

    scene.invalidate_light_list(&world).unwrap();
    assert!(!scene
        .compute_light_list(&world, CONSULT)
        .unwrap()
        .contains(&p("/World/Lights/Sky_light")));
}

#[test]
fn test_torch_meshes_validate() {
    let scene = torches(LoadPolicy::All);
    let results = scene.stage().validate_meshes();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, p("/World/Geo/torch_1/handle"));
    assert!(results[0].1.is_ok());
}

#[test]
fn test_inactive_ancestor_hides_torches() {
    let torch = p("/World/Geo/torch_1");
    let mut scene = torches(LoadPolicy::All);
    assert_eq!(scene.compute_light_list(&torch, IGNORE).unwrap().len(), 1);

    scene.set_active(&p("/World/Geo"), false).unwrap();
    assert_eq!(count(&scene, IGNORE), 1);
    assert_eq!(
        scene.compute_light_list(&torch, IGNORE),
        Err(LightListError::InvalidRoot {
            path: torch.clone(),
            reason: InvalidRootReason::NotFound,
        })
    );
    assert!(scene.stage().validate_meshes().is_empty());

    scene.set_active(&p("/World/Geo"), true).unwrap();
    assert_eq!(
        paths(&scene.compute_light_list(&torch, IGNORE).unwrap()),
        vec!["/World/Geo/torch_1/light"]
    );
    assert_eq!(scene.stage().validate_meshes().len(), 1);
}
