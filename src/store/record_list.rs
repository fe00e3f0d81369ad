use std::marker::PhantomData;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{read_records, write_list, KeyValueStore, StoreResult};

/// A persisted record with a stable identity inside its list.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn record_id(&self) -> &str;
}

/// A typed list stored whole under one key. Every mutation reads the list,
/// changes it in memory and writes all of it back.
pub struct RecordList<T: Record> {
    store: Rc<dyn KeyValueStore>,
    key: &'static str,
    _record: PhantomData<T>,
}

impl<T: Record> Clone for RecordList<T> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
            key: self.key,
            _record: PhantomData,
        }
    }
}

impl<T: Record> RecordList<T> {
    pub fn new(store: Rc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _record: PhantomData,
        }
    }

    /// Records that no longer decode are left out, so the next write drops them
    /// without touching the rest.
    pub fn list(&self) -> Vec<T> {
        read_records(self.store.as_ref(), self.key)
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.list().into_iter().find(|r| r.record_id() == id)
    }

    pub fn append(&self, record: T) -> StoreResult<()> {
        let mut records = self.list();
        records.push(record);
        self.replace_all(&records)
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert(&self, record: T) -> StoreResult<()> {
        let id = record.record_id().to_string();
        self.upsert_by(record, |r| r.record_id() == id)
    }

    /// Replaces the first record matching `same` in place, or appends it.
    pub fn upsert_by<P>(&self, record: T, same: P) -> StoreResult<()>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.list();
        match records.iter_mut().find(|r| same(&**r)) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.replace_all(&records)
    }

    /// Applies `change` to the record with `id` and returns the updated copy.
    pub fn update<F>(&self, id: &str, change: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.list();
        let Some(record) = records.iter_mut().find(|r| r.record_id() == id) else {
            return Ok(None);
        };
        change(record);
        let updated = record.clone();
        self.replace_all(&records)?;
        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.delete_where(|r| r.record_id() == id)
    }

    /// Removes every record matching `doomed`; returns whether any was removed.
    pub fn delete_where<P>(&self, doomed: P) -> StoreResult<bool>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.list();
        let before = records.len();
        records.retain(|r| !doomed(r));
        if records.len() == before {
            return Ok(false);
        }
        self.replace_all(&records)?;
        Ok(true)
    }

    pub fn replace_all(&self, records: &[T]) -> StoreResult<()> {
        write_list(self.store.as_ref(), self.key, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    struct Note {
        id: String,
        body: String,
    }

    impl Record for Note {
        fn record_id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    fn notes() -> RecordList<Note> {
        RecordList::new(Rc::new(MemoryStore::new()), "notes")
    }

    #[test]
    fn test_upsert_replaces_in_place_and_appends_new() {
        let notes = notes();
        notes.append(note("a", "first")).unwrap();
        notes.append(note("b", "second")).unwrap();

        notes.upsert(note("a", "edited")).unwrap();
        notes.upsert(note("c", "third")).unwrap();

        assert_eq!(
            notes.list(),
            vec![note("a", "edited"), note("b", "second"), note("c", "third")]
        );
    }

    #[test]
    fn test_update_and_delete_report_missing_ids() {
        let notes = notes();
        notes.append(note("a", "first")).unwrap();

        let updated = notes.update("a", |n| n.body.push('!')).unwrap();
        assert_eq!(updated, Some(note("a", "first!")));
        assert_eq!(notes.update("zz", |n| n.body.clear()).unwrap(), None);

        assert!(notes.delete("a").unwrap());
        assert!(!notes.delete("a").unwrap());
        assert!(notes.list().is_empty());
    }

    #[test]
    fn test_predicate_helpers_match_loosely() {
        let notes = notes();
        notes.append(note("A", "first")).unwrap();
        notes.append(note("b", "second")).unwrap();

        notes
            .upsert_by(note("A", "edited"), |n| n.id.eq_ignore_ascii_case("a"))
            .unwrap();
        assert_eq!(notes.list(), vec![note("A", "edited"), note("b", "second")]);

        assert!(notes.delete_where(|n| n.id.eq_ignore_ascii_case("B")).unwrap());
        assert!(!notes.delete_where(|n| n.id == "b").unwrap());
        assert_eq!(notes.list(), vec![note("A", "edited")]);
    }

    #[test]
    fn test_get_finds_by_id() {
        let notes = notes();
        notes.append(note("a", "first")).unwrap();
        assert_eq!(notes.get("a"), Some(note("a", "first")));
        assert_eq!(notes.get("b"), None);
    }
}
