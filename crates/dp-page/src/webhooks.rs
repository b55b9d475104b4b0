//! Descriptions of webhook events.

const EVENTS: &[(&str, &str)] = &[
    ("ping", "Webhook notification settings have changed"),
    ("build.scheduled", "A build has been scheduled"),
    ("build.running", "A build has started running"),
    ("build.finished", "A build has finished"),
    ("job.scheduled", "A job has been scheduled"),
    (
        "job.started",
        "A command step job has started running on an agent",
    ),
    ("job.finished", "A job has finished"),
    (
        "job.activated",
        "A block step job has been unblocked via the web or API",
    ),
    ("agent.connected", "An agent has connected"),
    ("agent.lost", "An agent has been marked as lost"),
    ("agent.disconnected", "An agent has disconnected"),
    ("agent.stopping", "An agent is stopping"),
    ("agent.stopped", "An agent has stopped"),
];

/// One-line description of a webhook event, `None` for unknown events.
pub(crate) fn webhook_description(event: &str) -> Option<&'static str> {
    EVENTS
        .iter()
        .find_map(|&(name, description)| (name == event).then_some(description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_events() {
        assert_eq!(
            webhook_description("build.scheduled"),
            Some("A build has been scheduled")
        );
        assert_eq!(
            webhook_description("ping"),
            Some("Webhook notification settings have changed")
        );
        assert_eq!(
            webhook_description("agent.stopped"),
            Some("An agent has stopped")
        );
    }

    #[test]
    fn test_unknown_event() {
        assert_eq!(webhook_description("unknown.event"), None);
        assert_eq!(webhook_description("Build.Scheduled"), None);
        assert_eq!(webhook_description(""), None);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let mut names: Vec<&str> = EVENTS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EVENTS.len());
        assert_eq!(EVENTS.len(), 13);
    }
}
