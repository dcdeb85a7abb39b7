use reflekt_core::preferences::{
    Aesthetic, FontChoice, JsonFilePreferenceStore, PreferenceStore, Preferences,
    PreferencesHolder, Theme,
};

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFilePreferenceStore::new(dir.path().join("prefs.json"));
    assert!(store.load().unwrap().is_none());

    let holder = PreferencesHolder::load(store);
    assert_eq!(holder.get(), Preferences::default());
}

#[test]
fn mutations_persist_across_holders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");

    let mut holder = PreferencesHolder::load(JsonFilePreferenceStore::new(&path));
    holder.toggle_theme().unwrap();
    holder.set_aesthetic(Aesthetic::Moody).unwrap();
    holder.set_font(FontChoice::JetBrainsMono).unwrap();

    let reloaded = PreferencesHolder::load(JsonFilePreferenceStore::new(&path));
    assert_eq!(reloaded.theme(), Theme::Light);
    assert_eq!(reloaded.aesthetic(), Aesthetic::Moody);
    assert_eq!(reloaded.font(), FontChoice::JetBrainsMono);
    assert_eq!(reloaded.font().info().name, "JetBrains Mono");
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFilePreferenceStore::new(&path);
    assert!(store.load().is_err());

    let mut holder = PreferencesHolder::load(store);
    assert_eq!(holder.get(), Preferences::default());

    holder.set_theme(Theme::Light).unwrap();
    let stored = JsonFilePreferenceStore::new(&path).load().unwrap().unwrap();
    assert_eq!(stored.theme, Theme::Light);
}
