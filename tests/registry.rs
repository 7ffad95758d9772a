// SPDX-License-Identifier: Apache-2.0

use weft::*;

#[test]
#[should_panic(expected = "registration error: 'Alpha' is already registered")]
fn test_double_registration_fails() {
    registry::clear();
    let _first = ModDef::new("Alpha");
    let _second = ModDef::new("Alpha");
}

#[test]
#[should_panic(expected = "registration error: 'Beta' is already registered")]
fn test_cross_kind_registration_fails() {
    registry::clear();
    let _module = ModDef::new("Beta");
    let _interface = IntfDef::new("Beta");
}

#[test]
fn test_get_returns_registered_definition() {
    registry::clear();
    let _def = ModDef::new("Gamma");
    let found = registry::get("Gamma", Kind::Module);
    assert_eq!(found.name(), "Gamma");
    assert_eq!(found.kind(), Kind::Module);
}

#[test]
#[should_panic(expected = "registration error: 'Nope' is not registered")]
fn test_get_unregistered_fails() {
    registry::clear();
    registry::get("Nope", Kind::Module);
}

#[test]
#[should_panic(expected = "registration error: 'Mixed' is registered as a different kind")]
fn test_get_kind_mismatch_fails() {
    registry::clear();
    let _def = ModDef::new("Mixed");
    registry::get("Mixed", Kind::Interface);
}

#[test]
fn test_get_or_create_fabricates_without_registering() {
    registry::clear();
    let ghost = registry::get_or_create("Ghost", Kind::Module);
    assert_eq!(ghost.name(), "Ghost");
    assert_eq!(ghost.kind(), Kind::Module);

    // The synthetic definition was not stored, so an explicit definition
    // of the same name still succeeds.
    let _real = ModDef::new("Ghost");
    let found = registry::get("Ghost", Kind::Module);
    assert_eq!(found.name(), "Ghost");
}

#[test]
fn test_deregister_frees_the_name() {
    registry::clear();
    let _def = ModDef::new("Tmp");
    registry::deregister("Tmp", Kind::Module);
    let _again = ModDef::new("Tmp");
}

#[test]
#[should_panic(expected = "registration error: 'Tmp' is registered as a different kind")]
fn test_deregister_kind_mismatch_fails() {
    registry::clear();
    let _def = ModDef::new("Tmp");
    registry::deregister("Tmp", Kind::Interface);
}

#[test]
fn test_clear_empties_the_table() {
    registry::clear();
    let _def = ModDef::new("Once");
    registry::clear();
    let _again = ModDef::new("Once");
}

#[test]
#[should_panic(expected = "value error: model 'rtl' is already defined on 'Dup'")]
fn test_duplicate_model_name_fails() {
    registry::clear();
    let def = ModDef::new("Dup");
    def.model("rtl", &["io"], |_scope, _ports| Vec::new());
    def.model("rtl", &["io"], |_scope, _ports| Vec::new());
}
