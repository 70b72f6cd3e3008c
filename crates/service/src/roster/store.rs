use std::collections::HashSet;
use std::path::{Path, PathBuf};

use models::Student;
use tracing::{debug, error, info, warn};

use crate::errors::ServiceError;
use crate::roster::repository::StudentRepository;
use crate::storage::json_list_store::JsonListStore;

/// File-backed student roster.
///
/// Holds the whole roster in memory in insertion order and rewrites the
/// backing file after every successful mutation. Lookups are linear scans.
/// A failed write is reported to the caller but the in-memory change stays,
/// so memory and disk can diverge until the next successful save.
#[derive(Debug)]
pub struct RosterStore {
    students: Vec<Student>,
    storage: JsonListStore<Student>,
}

impl RosterStore {
    /// Open the roster at `path`, loading whatever is there.
    /// Never fails: a missing or unreadable file yields an empty roster.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let mut store = Self { students: Vec::new(), storage: JsonListStore::new(path) };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Replace the in-memory roster with the file contents.
    pub fn load(&mut self) {
        let path = self.storage.path().display().to_string();
        self.students = match self.storage.read() {
            Ok(Some(students)) => {
                let mut seen = HashSet::new();
                for s in &students {
                    if !seen.insert(s.identifier) {
                        warn!(%path, identifier = s.identifier, "duplicate identifier in data file; lookups use the first entry");
                    }
                }
                info!(%path, count = students.len(), "roster loaded");
                students
            }
            Ok(None) => {
                debug!(%path, "data file not found; starting with an empty roster");
                Vec::new()
            }
            Err(e) => {
                error!(%path, error = %e, "failed to load roster; starting with an empty roster");
                Vec::new()
            }
        };
    }

    /// Write the full roster to the backing file.
    pub fn save(&self) -> Result<(), ServiceError> {
        self.storage.write(&self.students).map_err(|e| {
            error!(path = %self.storage.path().display(), error = %e, "failed to save roster");
            e
        })
    }

    pub fn find(&self, identifier: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.identifier == identifier)
    }

    /// Like [`find`](Self::find) but reports a missing record as `NotFound`.
    pub fn get(&self, identifier: i64) -> Result<&Student, ServiceError> {
        self.find(identifier).ok_or(ServiceError::NotFound(identifier))
    }

    pub fn list(&self) -> impl ExactSizeIterator<Item = &Student> + '_ {
        self.students.iter()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn insert(&mut self, identifier: i64, name: &str, grade: f64) -> Result<(), ServiceError> {
        if self.find(identifier).is_some() {
            return Err(ServiceError::DuplicateKey(identifier));
        }
        let student = Student::new(identifier, name, grade)?;
        self.students.push(student);
        info!(identifier, "student registered");
        self.save()
    }

    pub fn update_grade(&mut self, identifier: i64, new_grade: f64) -> Result<f64, ServiceError> {
        let idx = self.position(identifier)?;
        let previous = self.students[idx].set_grade(new_grade)?;
        info!(identifier, previous, new_grade, "grade updated");
        self.save()?;
        Ok(previous)
    }

    pub fn delete(&mut self, identifier: i64) -> Result<Student, ServiceError> {
        let idx = self.position(identifier)?;
        let removed = self.students.remove(idx);
        info!(identifier, "student deleted");
        self.save()?;
        Ok(removed)
    }

    fn position(&self, identifier: i64) -> Result<usize, ServiceError> {
        self.students
            .iter()
            .position(|s| s.identifier == identifier)
            .ok_or(ServiceError::NotFound(identifier))
    }
}

impl StudentRepository for RosterStore {
    fn find(&self, identifier: i64) -> Option<&Student> { RosterStore::find(self, identifier) }
    fn list(&self) -> impl ExactSizeIterator<Item = &Student> + '_ { RosterStore::list(self) }
    fn insert(&mut self, identifier: i64, name: &str, grade: f64) -> Result<(), ServiceError> { RosterStore::insert(self, identifier, name, grade) }
    fn update_grade(&mut self, identifier: i64, new_grade: f64) -> Result<f64, ServiceError> { RosterStore::update_grade(self, identifier, new_grade) }
    fn delete(&mut self, identifier: i64) -> Result<Student, ServiceError> { RosterStore::delete(self, identifier) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("roster_store_{}.json", Uuid::new_v4()))
    }

    fn snapshot(store: &RosterStore) -> Vec<(i64, String, f64)> {
        store.list().map(|s| (s.identifier, s.name.clone(), s.grade)).collect()
    }

    #[test]
    fn register_update_delete_scenario() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        assert!(store.is_empty());

        store.insert(1, "Ana", 8.5)?;
        store.insert(2, "Bea", 10.0)?;
        assert_eq!(store.update_grade(1, 9.0)?, 8.5);
        assert_eq!(snapshot(&store), vec![(1, "Ana".into(), 9.0), (2, "Bea".into(), 10.0)]);

        let removed = store.delete(2)?;
        assert_eq!(removed.name, "Bea");
        assert_eq!(snapshot(&store), vec![(1, "Ana".into(), 9.0)]);
        assert!(store.find(2).is_none());
        assert!(matches!(store.get(2), Err(ServiceError::NotFound(2))));

        // reload from disk
        let reloaded = RosterStore::open(&tmp);
        assert_eq!(snapshot(&reloaded), snapshot(&store));

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn distinct_inserts_grow_by_one() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        for id in [5_i64, -3, 0, 42, i64::MAX] {
            let before = store.len();
            store.insert(id, "Someone", 5.0)?;
            assert_eq!(store.len(), before + 1);
            assert_eq!(store.find(id).map(|s| s.identifier), Some(id));
        }
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn duplicate_insert_leaves_roster_unchanged() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        store.insert(1, "Ana", 8.5)?;
        let before = snapshot(&store);

        // duplicate wins over invalid fields
        assert!(matches!(store.insert(1, "", 99.0), Err(ServiceError::DuplicateKey(1))));
        assert!(matches!(store.insert(1, "Outra", 5.0), Err(ServiceError::DuplicateKey(1))));
        assert_eq!(snapshot(&store), before);

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn grade_boundaries_on_insert_and_update() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        store.insert(1, "Zero", 0.0)?;
        store.insert(2, "Ten", 10.0)?;
        assert!(matches!(store.insert(3, "Low", -0.01), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(store.insert(4, "High", 10.01), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(store.insert(5, "   ", 5.0), Err(ServiceError::InvalidInput(_))));
        assert_eq!(store.len(), 2);

        assert!(matches!(store.update_grade(1, 10.01), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(store.update_grade(1, -0.01), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(store.update_grade(1, f64::NAN), Err(ServiceError::InvalidInput(_))));
        assert_eq!(store.find(1).map(|s| s.grade), Some(0.0));
        assert_eq!(store.update_grade(2, 0.0)?, 10.0);

        // missing record is reported before the grade is looked at
        assert!(matches!(store.update_grade(99, 50.0), Err(ServiceError::NotFound(99))));

        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn delete_missing_leaves_roster_unchanged() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        store.insert(1, "Ana", 8.5)?;
        assert!(matches!(store.delete(7), Err(ServiceError::NotFound(7))));
        assert_eq!(store.len(), 1);
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn missing_file_is_not_created_until_first_mutation() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        assert!(store.is_empty());
        assert!(!tmp.exists());
        store.insert(1, "Ana", 8.5)?;
        assert!(tmp.exists());
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn corrupt_file_loads_as_empty() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        fs::write(&tmp, r#"[{"matricula": 1, "nome": "Ana"}]"#)?;
        let store = RosterStore::open(&tmp);
        assert!(store.is_empty());
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn saved_file_layout() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        store.insert(1, "João", 8.5)?;
        let text = fs::read_to_string(&tmp)?;
        assert_eq!(
            text,
            "[\n  {\n    \"matricula\": 1,\n    \"nome\": \"João\",\n    \"nota\": 8.5\n  }\n]"
        );
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn duplicate_identifiers_in_file_resolve_to_first() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        fs::write(
            &tmp,
            r#"[{"matricula": 1, "nome": "First", "nota": 1.0}, {"matricula": 1, "nome": "Second", "nota": 2.0}]"#,
        )?;
        let mut store = RosterStore::open(&tmp);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find(1).map(|s| s.name.as_str()), Some("First"));
        let removed = store.delete(1)?;
        assert_eq!(removed.name, "First");
        assert_eq!(store.find(1).map(|s| s.name.as_str()), Some("Second"));
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn save_failure_keeps_memory_and_reports_persistence() -> Result<(), anyhow::Error> {
        // a directory can neither be parsed nor overwritten as a file
        let dir = std::env::temp_dir().join(format!("roster_store_dir_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir)?;
        let mut store = RosterStore::open(&dir);
        assert!(store.is_empty());

        assert!(matches!(store.insert(1, "Ana", 8.5), Err(ServiceError::Persistence(_))));
        assert_eq!(store.len(), 1);
        assert!(matches!(store.update_grade(1, 7.0), Err(ServiceError::Persistence(_))));
        assert_eq!(store.find(1).map(|s| s.grade), Some(7.0));
        assert!(matches!(store.delete(1), Err(ServiceError::Persistence(_))));
        assert!(store.is_empty());

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn list_is_restartable_and_ordered() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        store.insert(3, "C", 3.0)?;
        store.insert(1, "A", 1.0)?;
        store.insert(2, "B", 2.0)?;
        let first: Vec<i64> = store.list().map(|s| s.identifier).collect();
        let second: Vec<i64> = store.list().map(|s| s.identifier).collect();
        assert_eq!(first, vec![3, 1, 2]);
        assert_eq!(first, second);
        assert_eq!(store.list().len(), 3);
        let _ = fs::remove_file(&tmp);
        Ok(())
    }

    #[test]
    fn usable_through_the_repository_trait() -> Result<(), anyhow::Error> {
        fn exercise<R: StudentRepository>(repo: &mut R) -> Result<usize, ServiceError> {
            repo.insert(10, "Dora", 6.0)?;
            repo.update_grade(10, 6.5)?;
            Ok(repo.list().len())
        }
        let tmp = tmp_path();
        let mut store = RosterStore::open(&tmp);
        assert_eq!(exercise(&mut store)?, 1);
        assert_eq!(StudentRepository::find(&store, 10).map(|s| s.grade), Some(6.5));
        let _ = fs::remove_file(&tmp);
        Ok(())
    }
}
