use reflekt_core::db::open_db_in_memory;
use reflekt_core::model::entry::{EntryValidationError, DEFAULT_TITLE, MAX_IMAGES_PER_ENTRY};
use reflekt_core::view::order::is_newest_first;
use reflekt_core::{
    EntryDraft, EntryPatch, EntryRepository, MemoryEntryRepository, Mood, OwnerScopedRepository,
    RepoError, SqliteEntryRepository,
};
use std::thread::sleep;
use std::time::Duration;
use uuid::Uuid;

const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Runs `check` against every adapter so behavior stays in parity.
fn for_each_backend(check: impl Fn(&dyn EntryRepository)) {
    let memory = MemoryEntryRepository::new();
    check(&memory);

    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteEntryRepository::try_new(&conn).unwrap();
    check(&sqlite);
}

/// Separates creation timestamps, which have millisecond resolution.
fn tick() {
    sleep(Duration::from_millis(5));
}

#[test]
fn create_defaults_blank_title_and_mood() {
    for_each_backend(|repo| {
        let entry = repo
            .create_entry("owner-1", &EntryDraft::new("   ", "A quiet evening."))
            .unwrap();

        assert_eq!(entry.title, DEFAULT_TITLE);
        assert_eq!(entry.mood, Mood::Calm);
        assert_eq!(entry.user_id, "owner-1");
        assert!(entry.tags.is_empty());
        assert!(entry.images.is_empty());
        assert!(entry.created_at <= entry.updated_at);

        let loaded = repo.get_entry(entry.id).unwrap().unwrap();
        assert_eq!(loaded, entry);
    });
}

#[test]
fn create_keeps_tags_and_images_in_order() {
    for_each_backend(|repo| {
        let mut draft = EntryDraft::new("Tagged", "body")
            .with_mood(Mood::Happy)
            .with_tags(["#walk", "spring", "walk", "  "]);
        draft.attach_image(PIXEL).unwrap();

        let entry = repo.create_entry("owner-1", &draft).unwrap();
        assert_eq!(entry.tags, vec!["walk".to_string(), "spring".to_string()]);
        assert_eq!(entry.images, vec![PIXEL.to_string()]);
        assert_eq!(entry.mood, Mood::Happy);
    });
}

#[test]
fn create_rejects_empty_content_without_images() {
    for_each_backend(|repo| {
        let err = repo
            .create_entry("owner-1", &EntryDraft::new("Title", "  \n "))
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(EntryValidationError::EmptyContent)
        ));
        assert!(repo.list_entries("owner-1").unwrap().is_empty());
    });
}

#[test]
fn image_only_entry_is_accepted() {
    for_each_backend(|repo| {
        let mut draft = EntryDraft::new("Photo", "");
        draft.attach_image(PIXEL).unwrap();
        let entry = repo.create_entry("owner-1", &draft).unwrap();
        assert_eq!(entry.content, "");
        assert_eq!(entry.images.len(), 1);
    });
}

#[test]
fn fourth_image_is_rejected_before_any_write() {
    let mut draft = EntryDraft::new("Album", "body");
    for _ in 0..MAX_IMAGES_PER_ENTRY {
        draft.attach_image(PIXEL).unwrap();
    }
    let err = draft.attach_image(PIXEL).unwrap_err();
    assert_eq!(
        err,
        EntryValidationError::TooManyImages {
            count: MAX_IMAGES_PER_ENTRY + 1,
            max: MAX_IMAGES_PER_ENTRY,
        }
    );

    for_each_backend(|repo| {
        let patch = EntryPatch::default().images(vec![PIXEL.to_string(); 4]);
        let entry = repo.create_entry("owner-1", &draft).unwrap();
        let err = repo.update_entry(entry.id, &patch).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(EntryValidationError::TooManyImages { count: 4, max: 3 })
        ));
        assert_eq!(repo.get_entry(entry.id).unwrap().unwrap().images.len(), 3);
    });
}

#[test]
fn list_returns_only_owner_entries_newest_first() {
    for_each_backend(|repo| {
        let first = repo
            .create_entry("owner-1", &EntryDraft::new("First", "one"))
            .unwrap();
        tick();
        repo.create_entry("owner-2", &EntryDraft::new("Foreign", "other"))
            .unwrap();
        tick();
        let second = repo
            .create_entry("owner-1", &EntryDraft::new("Second", "two"))
            .unwrap();

        let entries = repo.list_entries("owner-1").unwrap();
        let ids: Vec<Uuid> = entries.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(is_newest_first(&entries));
        assert!(entries.iter().all(|entry| entry.user_id == "owner-1"));

        assert!(repo.list_entries("nobody").unwrap().is_empty());
    });
}

#[test]
fn update_stamps_updated_at_and_keeps_owner_and_created_at() {
    for_each_backend(|repo| {
        let created = repo
            .create_entry("owner-1", &EntryDraft::new("Draft", "before"))
            .unwrap();
        tick();

        let patch = EntryPatch::default()
            .content("after")
            .mood(Mood::Reflective);
        let updated = repo.update_entry(created.id, &patch).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_id, created.user_id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.content, "after");
        assert_eq!(updated.mood, Mood::Reflective);
    });
}

#[test]
fn update_and_delete_missing_entry_are_not_found() {
    for_each_backend(|repo| {
        let missing = Uuid::new_v4();
        let err = repo
            .update_entry(missing, &EntryPatch::default().title("x"))
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == missing));
        assert!(matches!(
            repo.delete_entry(missing).unwrap_err(),
            RepoError::NotFound(_)
        ));
        assert!(repo.get_entry(missing).unwrap().is_none());
    });
}

#[test]
fn delete_removes_entry() {
    for_each_backend(|repo| {
        let mut draft = EntryDraft::new("Gone", "soon").with_tags(["tmp"]);
        draft.attach_image(PIXEL).unwrap();
        let entry = repo.create_entry("owner-1", &draft).unwrap();

        repo.delete_entry(entry.id).unwrap();
        assert!(repo.get_entry(entry.id).unwrap().is_none());
        assert!(repo.list_entries("owner-1").unwrap().is_empty());
        assert!(matches!(
            repo.delete_entry(entry.id).unwrap_err(),
            RepoError::NotFound(_)
        ));
    });
}

#[test]
fn blank_owner_is_rejected() {
    for_each_backend(|repo| {
        let err = repo
            .create_entry(" ", &EntryDraft::new("t", "c"))
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(EntryValidationError::MissingOwner)
        ));
    });
}

#[test]
fn scoped_repository_denies_foreign_access() {
    let memory = MemoryEntryRepository::new();
    let foreign = memory
        .create_entry("owner-2", &EntryDraft::new("Theirs", "private"))
        .unwrap();

    let scoped = OwnerScopedRepository::new(&memory, "owner-1");
    let own = scoped
        .create_entry("owner-1", &EntryDraft::new("Mine", "mine"))
        .unwrap();

    assert!(matches!(
        scoped.create_entry("owner-2", &EntryDraft::new("x", "y")),
        Err(RepoError::PermissionDenied(_))
    ));
    assert!(matches!(
        scoped.get_entry(foreign.id),
        Err(RepoError::PermissionDenied(_))
    ));
    assert!(matches!(
        scoped.update_entry(foreign.id, &EntryPatch::default().title("hijack")),
        Err(RepoError::PermissionDenied(_))
    ));
    assert!(matches!(
        scoped.delete_entry(foreign.id),
        Err(RepoError::PermissionDenied(_))
    ));
    assert!(matches!(
        scoped.list_entries("owner-2"),
        Err(RepoError::PermissionDenied(_))
    ));
    assert!(matches!(
        scoped.delete_entry(Uuid::new_v4()),
        Err(RepoError::NotFound(_))
    ));

    let listed = scoped.list_entries("owner-1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, own.id);
    assert_eq!(
        memory.get_entry(foreign.id).unwrap().unwrap().title,
        "Theirs"
    );
}

#[test]
fn sqlite_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.sqlite3");

    let id = {
        let conn = reflekt_core::open_db(&path).unwrap();
        let repo = SqliteEntryRepository::try_new(&conn).unwrap();
        repo.create_entry(
            "owner-1",
            &EntryDraft::new("Kept", "on disk").with_tags(["disk"]),
        )
        .unwrap()
        .id
    };

    let conn = reflekt_core::open_db(&path).unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let entry = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(entry.title, "Kept");
    assert_eq!(entry.tags, vec!["disk".to_string()]);
}
