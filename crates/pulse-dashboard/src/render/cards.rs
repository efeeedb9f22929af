//! Grouped collaborator cards

use std::collections::BTreeMap;

use pulse_core::{CollaboratorMetrics, Group, StatusKey};

use crate::document::{format_hours, CardView, Node};

/// Collaborator names per known group, rebuilt from every snapshot
///
/// Only the filter controller reads it; it never outlives the next snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCache {
    members: BTreeMap<Group, Vec<String>>,
}

impl GroupCache {
    /// Partition collaborators whose `grupo` is a known group; names come out
    /// sorted within each group
    pub fn rebuild(&mut self, collaborators: Option<&BTreeMap<String, CollaboratorMetrics>>) {
        self.members.clear();
        let Some(collaborators) = collaborators else {
            return;
        };

        for (name, metrics) in collaborators {
            if let Some(group) = metrics.grupo.as_ref().and_then(|label| label.group()) {
                self.members.entry(group).or_default().push(name.clone());
            }
        }
        for names in self.members.values_mut() {
            names.sort();
        }
    }

    /// Members of a group, sorted
    pub fn members(&self, group: Group) -> &[String] {
        self.members.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.members.values().all(Vec::is_empty)
    }
}

/// Card section nodes: a header then sorted cards per non-empty group,
/// JULIO before LEANDRO
pub fn render_cards(
    collaborators: &BTreeMap<String, CollaboratorMetrics>,
    cache: &GroupCache,
) -> Vec<Node> {
    let mut nodes = Vec::new();

    for group in Group::ALL {
        let members = cache.members(group);
        if members.is_empty() {
            continue;
        }

        nodes.push(Node::GroupHeader { group });
        for name in members {
            if let Some(metrics) = collaborators.get(name) {
                nodes.push(Node::CollaboratorCard(card(name, group, metrics)));
            }
        }
    }

    nodes
}

fn card(name: &str, group: Group, metrics: &CollaboratorMetrics) -> CardView {
    CardView {
        name: name.to_string(),
        group: group.as_str().to_string(),
        verified: metrics.count(StatusKey::Verified),
        analysis: metrics.count(StatusKey::Analysis),
        approved: metrics.count(StatusKey::Approved),
        resolution: format_hours(metrics.avg_resolution_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::GroupLabel;

    fn collaborator(grupo: Option<&str>, verified: Option<u64>, hours: f64) -> CollaboratorMetrics {
        let mut status_counts = BTreeMap::new();
        if let Some(v) = verified {
            status_counts.insert("verified".to_string(), v);
        }
        CollaboratorMetrics {
            grupo: grupo.map(|g| GroupLabel::from(g.to_string())),
            status_counts,
            avg_resolution_time: hours,
        }
    }

    fn sample() -> BTreeMap<String, CollaboratorMetrics> {
        let mut map = BTreeMap::new();
        map.insert("Zeca".to_string(), collaborator(Some("LEANDRO"), Some(1), 1.0));
        map.insert("Bia".to_string(), collaborator(Some("JULIO"), Some(2), 3.14));
        map.insert("Ana".to_string(), collaborator(Some("JULIO"), None, 0.0));
        map.insert("Outro".to_string(), collaborator(Some("N/A"), Some(9), 9.0));
        map.insert("Solto".to_string(), collaborator(None, Some(9), 9.0));
        map
    }

    #[test]
    fn test_cache_only_holds_known_groups() {
        let mut cache = GroupCache::default();
        cache.rebuild(Some(&sample()));
        assert_eq!(cache.members(Group::Julio), ["Ana", "Bia"]);
        assert_eq!(cache.members(Group::Leandro), ["Zeca"]);
    }

    #[test]
    fn test_cache_cleared_without_collaborators() {
        let mut cache = GroupCache::default();
        cache.rebuild(Some(&sample()));
        cache.rebuild(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cards_grouped_and_sorted() {
        let collaborators = sample();
        let mut cache = GroupCache::default();
        cache.rebuild(Some(&collaborators));

        let nodes = render_cards(&collaborators, &cache);
        let names: Vec<String> = nodes
            .iter()
            .map(|node| match node {
                Node::GroupHeader { group } => format!("# {}", group),
                Node::CollaboratorCard(card) => card.name.clone(),
                other => panic!("unexpected node {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["# JULIO", "Ana", "Bia", "# LEANDRO", "Zeca"]);
    }

    #[test]
    fn test_empty_status_counts_render_zero() {
        let mut collaborators = BTreeMap::new();
        collaborators.insert("Ana".to_string(), collaborator(Some("JULIO"), None, 0.0));
        let mut cache = GroupCache::default();
        cache.rebuild(Some(&collaborators));

        let nodes = render_cards(&collaborators, &cache);
        let Node::CollaboratorCard(card) = &nodes[1] else {
            panic!("expected a card");
        };
        assert_eq!((card.verified, card.analysis, card.approved), (0, 0, 0));
        assert_eq!(card.resolution, "0.0");
    }

    #[test]
    fn test_group_without_members_has_no_header() {
        let mut collaborators = BTreeMap::new();
        collaborators.insert("Zeca".to_string(), collaborator(Some("LEANDRO"), None, 1.0));
        let mut cache = GroupCache::default();
        cache.rebuild(Some(&collaborators));

        let nodes = render_cards(&collaborators, &cache);
        assert_eq!(nodes[0], Node::GroupHeader { group: Group::Leandro });
        assert_eq!(nodes.len(), 2);
    }
}
