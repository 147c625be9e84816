//! Process-role partitioning.
//!
//! A coupled run is a world of ranks, each belonging to one application
//! (e.g. `"ping"` and `"pong"`). The partition is computed once at
//! startup and passed explicitly into interface creation; nothing here
//! is process-global.

use braid_core::Rank;
use indexmap::IndexMap;

use crate::error::TransportError;

/// One rank's view of the process-role split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    rank: Rank,
    app: String,
    app_rank: usize,
    app_size: usize,
    world_size: usize,
}

impl Partition {
    /// This rank's position in the world.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// The application this rank belongs to.
    pub fn app(&self) -> &str {
        &self.app
    }

    /// This rank's position among ranks of the same application.
    pub fn app_rank(&self) -> usize {
        self.app_rank
    }

    /// Number of ranks in this rank's application.
    pub fn app_size(&self) -> usize {
        self.app_size
    }

    /// Number of ranks in the world.
    pub fn world_size(&self) -> usize {
        self.world_size
    }
}

/// Split a world by application role.
///
/// `apps[r]` names the application of rank `r`. Returns one partition
/// per rank, in rank order. Ranks of the same application are numbered
/// by ascending world rank.
pub fn split_by_app(apps: &[&str]) -> Result<Vec<Partition>, TransportError> {
    if apps.is_empty() {
        return Err(TransportError::EmptyWorld);
    }

    let mut sizes: IndexMap<&str, usize> = IndexMap::new();
    for (r, app) in apps.iter().enumerate() {
        if app.is_empty() {
            return Err(TransportError::EmptyAppName {
                rank: Rank(r as u32),
            });
        }
        *sizes.entry(*app).or_insert(0) += 1;
    }

    let mut seen: IndexMap<&str, usize> = IndexMap::new();
    let partitions = apps
        .iter()
        .enumerate()
        .map(|(r, app)| {
            let app_rank = seen.entry(*app).or_insert(0);
            let partition = Partition {
                rank: Rank(r as u32),
                app: (*app).to_owned(),
                app_rank: *app_rank,
                app_size: sizes[*app],
                world_size: apps.len(),
            };
            *app_rank += 1;
            partition
        })
        .collect();
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_assigns_app_ranks() {
        let parts = split_by_app(&["ping", "pong", "ping"]).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].app(), "ping");
        assert_eq!(parts[0].app_rank(), 0);
        assert_eq!(parts[2].app_rank(), 1);
        assert_eq!(parts[2].app_size(), 2);
        assert_eq!(parts[1].app(), "pong");
        assert_eq!(parts[1].app_size(), 1);
        assert!(parts.iter().all(|p| p.world_size() == 3));
        assert_eq!(parts[1].rank(), Rank(1));
    }

    #[test]
    fn empty_world_rejected() {
        assert_eq!(split_by_app(&[]), Err(TransportError::EmptyWorld));
    }

    #[test]
    fn empty_app_name_rejected() {
        assert_eq!(
            split_by_app(&["ping", ""]),
            Err(TransportError::EmptyAppName { rank: Rank(1) })
        );
    }
}
