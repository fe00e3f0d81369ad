use std::rc::Rc;

use log::info;

use super::{keys, new_record_id, KeyValueStore, Record, RecordList, StoreError};
use crate::model::{Collection, Visibility};

impl Record for Collection {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Please enter collection title")]
    MissingTitle,
    #[error("Please add cover image")]
    MissingCover,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct CollectionRepository {
    collections: RecordList<Collection>,
}

impl CollectionRepository {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            collections: RecordList::new(store, keys::COLLECTIONS),
        }
    }

    pub fn create(
        &self,
        title: &str,
        cover_image: Option<&str>,
        visible_to: Visibility,
    ) -> Result<Collection, CollectionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CollectionError::MissingTitle);
        }
        let image = cover_image
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(CollectionError::MissingCover)?;

        let collection = Collection {
            id: new_record_id(),
            title: title.to_string(),
            image: image.to_string(),
            visible_to,
        };
        self.collections.append(collection.clone())?;
        info!(target: "store", "Created collection {} ({:?})", collection.id, visible_to);
        Ok(collection)
    }

    pub fn list(&self) -> Vec<Collection> {
        self.collections.list()
    }

    pub fn list_public(&self) -> Vec<Collection> {
        self.list().into_iter().filter(Collection::is_public).collect()
    }

    pub fn get(&self, id: &str) -> Option<Collection> {
        self.collections.get(id)
    }

    pub fn update(&self, collection: Collection) -> Result<(), StoreError> {
        self.collections.upsert(collection)
    }

    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.collections.delete(id)
    }
}
