use crate::collaborators::SwarmAgent;

/// First configured auto-respond agent whose keyword list matches
/// `content` (case-insensitive substring), in list order — spec §4.1 step
/// 10.
pub fn match_agent<'a>(agents: &'a [SwarmAgent], content: &str) -> Option<&'a SwarmAgent> {
    let lower = content.to_lowercase();
    agents.iter().find(|agent| {
        agent
            .keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && lower.contains(&keyword.to_lowercase()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, keywords: &[&str]) -> SwarmAgent {
        SwarmAgent {
            agent_id: id.to_string(),
            name: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn matches_first_agent_whose_keyword_appears() {
        let agents = vec![agent("billing", &["invoice", "payment"]), agent("support", &["help"])];
        let matched = match_agent(&agents, "I need help with my invoice").unwrap();
        assert_eq!(matched.agent_id, "billing");
    }

    #[test]
    fn no_keyword_match_returns_none() {
        let agents = vec![agent("billing", &["invoice"])];
        assert!(match_agent(&agents, "what's the weather").is_none());
    }

    #[test]
    fn empty_keyword_never_matches() {
        let agents = vec![agent("ghost", &[""])];
        assert!(match_agent(&agents, "anything at all").is_none());
    }
}
