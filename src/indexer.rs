use crate::metadata::LabelDocument;
use crate::processor::Step;
use crate::search::Searcher;

pub async fn persist(searcher: &dyn Searcher, document: &LabelDocument) -> Step<()> {
    log::info!("Indexing the document for {}", document.object_key);

    match searcher.index_document(document).await {
        Ok(()) => Step::Proceed(()),
        Err(e) => Step::ExternalFailure(format!("failed to index document: {}", e)),
    }
}
