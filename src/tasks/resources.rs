use std::time::Duration;

use super::{CancellationToken, DeferredTask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub name: String,
    pub url: String,
}

impl ResourceLink {
    fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        ResourceLink {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Further reading for a technology title. Unknown titles get generic documentation links.
pub fn additional_resources(title: &str) -> Vec<ResourceLink> {
    match title {
        "React" => vec![
            ResourceLink::new("React Router", "https://reactrouter.com"),
            ResourceLink::new("React Query", "https://tanstack.com/query"),
            ResourceLink::new("Next.js", "https://nextjs.org"),
        ],
        "Node.js" => vec![
            ResourceLink::new("NestJS", "https://nestjs.com"),
            ResourceLink::new("Socket.io", "https://socket.io"),
            ResourceLink::new("PM2", "https://pm2.keymetrics.io"),
        ],
        "Typescript" => vec![
            ResourceLink::new("TS Handbook", "https://www.typescriptlang.org/docs"),
            ResourceLink::new("TS Config", "https://www.typescriptlang.org/tsconfig"),
        ],
        other => vec![
            ResourceLink::new(
                "Official documentation",
                format!("https://{}.org", other.to_lowercase()),
            ),
            ResourceLink::new(
                "MDN Web Docs",
                format!("https://developer.mozilla.org/en-US/docs/Web/{}", other),
            ),
        ],
    }
}

pub fn fetch_additional_resources(
    title: &str,
    delay: Duration,
    token: CancellationToken,
) -> DeferredTask<Vec<ResourceLink>> {
    let title = title.to_string();
    DeferredTask::spawn(delay, token, move || additional_resources(&title))
}
