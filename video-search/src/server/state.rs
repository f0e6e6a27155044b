// App state for the Axum server
use video_search_repository::SearchIndexService;

#[derive(Clone)]
pub struct AppState {
    pub search: SearchIndexService,
}
