#[cfg(test)]
mod tests {
    use std::fs;

    use super::super::json_repo::JsonFileRepository;
    use crate::domain::{repository::DocumentRepository, Document, TodoError};

    fn sample() -> Document {
        let mut doc = Document::default();
        let id = doc.create_list(Some("Chores")).id.clone();
        let list = doc.list_mut(&id).unwrap();
        list.add_task("dishes").unwrap();
        list.add_task("laundry").unwrap();
        list.tasks[0].toggle();
        doc.create_list(None);
        doc
    }

    #[test]
    fn missing_file_loads_empty_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let repo = JsonFileRepository::new(&path);

        assert_eq!(repo.path(), path.as_path());
        assert_eq!(repo.load().unwrap(), Document::default());
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn save_creates_directories_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("a/b/data.json"));
        let doc = sample();

        repo.save(&doc).unwrap();
        assert_eq!(repo.load().unwrap(), doc);
    }

    #[test]
    fn saved_file_holds_the_complete_pretty_document() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("data.json"));
        let mut doc = sample();
        let id = doc.lists[0].id.clone();
        for i in 0..500 {
            doc.list_mut(&id).unwrap().add_task(&format!("bulk task {i}")).unwrap();
        }

        repo.save(&doc).unwrap();
        let written = fs::read_to_string(repo.path()).unwrap();
        assert_eq!(written, serde_json::to_string_pretty(&doc).unwrap());
    }

    #[test]
    fn interrupted_save_leaves_previous_snapshot_intact() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("data.json"));
        let before = sample();
        repo.save(&before).unwrap();

        let mut after = before.clone();
        after.lists.clear();
        // Crash after the temp file is written but before the rename: the
        // staged file stays behind on disk and the target is never touched.
        let staged = repo.stage(&after).unwrap();
        let leftover = staged.into_temp_path().keep().unwrap();
        assert!(leftover.exists());

        assert_eq!(repo.load().unwrap(), before);
    }

    #[test]
    fn no_temp_files_remain_after_a_successful_save() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("data.json"));
        repo.save(&sample()).unwrap();
        repo.save(&Document::default()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["data.json"]);
    }

    #[test]
    fn garbage_and_empty_object_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let repo = JsonFileRepository::new(&path);

        for raw in ["not json", "{}", r#"{"lists": {}}"#, ""] {
            fs::write(&path, raw).unwrap();
            let err = repo.load().unwrap_err();
            assert!(matches!(err, TodoError::CorruptData { .. }), "{raw:?} gave {err:?}");
        }
    }

    #[test]
    fn corrupt_file_is_not_rewritten_by_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{\"lists\": [").unwrap();

        assert!(JsonFileRepository::new(&path).load().is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"lists\": [");
    }

    #[test]
    fn blank_title_on_disk_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"lists":[{"id":"l","name":"L","tasks":[
                {"id":"t","title":"  ","completed":false,"created_at":"2024-01-01T00:00:00Z"}]}]}"#,
        )
        .unwrap();

        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("empty title"), "{err}");
    }

    #[test]
    fn duplicate_list_ids_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"lists":[{"id":"l","name":"A","tasks":[]},{"id":"l","name":"B","tasks":[]}]}"#,
        )
        .unwrap();

        assert!(matches!(JsonFileRepository::new(&path).load(), Err(TodoError::CorruptData { .. })));
    }
}
