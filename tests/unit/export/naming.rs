use super::*;
use crate::scene::model::Scene;

fn scene() -> Scene {
    Scene::from_json_str(
        r#"{
        "materials": [
            { "name": "Car Paint+1" },
            { "name": "Car Paint+1", "library": "//libs/cars-v2.blend" }
        ]
    }"#,
    )
    .unwrap()
}

#[test]
fn clean_string_substitutes_disallowed_characters() {
    assert_eq!(clean_string("a+b-c d.e"), "apbmc_d_e");
    assert_eq!(clean_string("Plain01"), "Plain01");
}

#[test]
fn resolve_is_idempotent() {
    let s = scene();
    let ma = &s.materials[0];
    let a = resolve(ma, Prefix::Material, None);
    let b = resolve(ma, Prefix::Material, None);
    assert_eq!(a, b);
    assert_eq!(a, "MACar_Paintp1");
}

#[test]
fn library_entities_do_not_collide_with_local_ones() {
    let s = scene();
    let local = resolve(&s.materials[0], Prefix::Material, None);
    let linked = resolve(&s.materials[1], Prefix::Material, None);
    assert_ne!(local, linked);
    assert_eq!(linked, "MALIcarsmv2Car_Paintp1");
}

#[test]
fn object_variants_yield_distinct_names() {
    let s = scene();
    let ma = &s.materials[0];
    let a = resolve(ma, Prefix::Material, Some(&object_suffix("Cube")));
    let b = resolve(ma, Prefix::Material, Some(&object_suffix("Cube.001")));
    assert_eq!(a, "MACar_Paintp1OBCube");
    assert_eq!(b, "MACar_Paintp1OBCube_001");
    assert_ne!(a, b);
}

#[test]
fn geometry_names_are_sanitized() {
    assert_eq!(geometry_name("Cube.001"), "MECube_001");
}
