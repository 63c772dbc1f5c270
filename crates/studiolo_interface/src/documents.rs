use async_trait::async_trait;
use parking_lot::RwLock;
use studiolo_core::Document;
use studiolo_error::StudioloResult;

/// Where study material comes from.
///
/// The pipeline itself takes document slices; this trait is for callers that
/// hold their material elsewhere (a database, a directory watcher) and hand
/// the tutor a handle instead.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// All documents currently known to the source.
    async fn documents(&self) -> StudioloResult<Vec<Document>>;

    /// Looks up one document by id.
    async fn document(&self, id: &str) -> StudioloResult<Option<Document>> {
        let docs = self.documents().await?;
        Ok(docs.into_iter().find(|d| d.id() == id))
    }
}

/// Document source backed by a vector, for tests and small local setups.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    docs: RwLock<Vec<Document>>,
}

impl InMemoryDocuments {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    pub fn add(&self, doc: Document) {
        self.docs.write().push(doc);
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocuments {
    async fn documents(&self) -> StudioloResult<Vec<Document>> {
        Ok(self.docs.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_by_id_finds_added_documents() {
        let source = InMemoryDocuments::default();
        let doc = Document::new("notes.pdf", "content");
        let id = doc.id().clone();
        source.add(doc);

        let found = source.document(&id).await.expect("source is infallible");
        assert_eq!(found.expect("document was added").name(), "notes.pdf");
        assert!(
            source
                .document("missing")
                .await
                .expect("source is infallible")
                .is_none()
        );
    }
}
