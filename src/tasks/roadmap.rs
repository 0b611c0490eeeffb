use std::time::Duration;

use crate::record::{Difficulty, NewTechnology};

use super::{CancellationToken, DeferredTask, TaskError};

/// A learning roadmap: technologies to add in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roadmap {
    pub source: String,
    pub technologies: Vec<NewTechnology>,
}

/// The fixed roadmap every import resolves to.
pub fn roadmap_fixture(source: &str) -> Roadmap {
    Roadmap {
        source: source.to_string(),
        technologies: vec![
            NewTechnology::new("Vue.js")
                .with_description("Progressive JavaScript framework")
                .with_category("frontend")
                .with_difficulty(Difficulty::Beginner)
                .with_resource("https://vuejs.org"),
            NewTechnology::new("Express.js")
                .with_description("Web framework for Node.js")
                .with_category("backend")
                .with_difficulty(Difficulty::Intermediate)
                .with_resource("https://expressjs.com"),
        ],
    }
}

/// Simulate fetching the roadmap at `url`. A blank url is rejected up front.
pub fn fetch_roadmap(
    url: &str,
    delay: Duration,
    token: CancellationToken,
) -> Result<DeferredTask<Roadmap>, TaskError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(TaskError::InvalidRequest("roadmap url is empty".to_string()));
    }
    let source = url.to_string();
    Ok(DeferredTask::spawn(delay, token, move || {
        roadmap_fixture(&source)
    }))
}
