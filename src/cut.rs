use crate::{errors::Result, parsers::cut_file, ChannelGroupId};

/// Cluster labels for every spike of one channel group, as written by a spike sorter.
/// Label 0 is unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    channel_group_id: ChannelGroupId,
    indices: Vec<u32>,
    declared_spike_count: Option<usize>,
}

impl Cut {
    /// Parses the text of a `<session>_<id + 1>.cut` file.
    pub fn from_text(channel_group_id: ChannelGroupId, text: &str) -> Result<Self> {
        let contents = cut_file(text)?;

        Ok(Self {
            channel_group_id,
            indices: contents.labels,
            declared_spike_count: contents.declared_spike_count,
        })
    }

    pub fn channel_group_id(&self) -> ChannelGroupId {
        self.channel_group_id
    }

    /// One cluster label per spike, in spike order.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The spike count written on the `Exact_cut_for` line, if any. Always equal to [`Cut::len`] when present.
    pub fn declared_spike_count(&self) -> Option<usize> {
        self.declared_spike_count
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of clusters in use, not counting the unclassified cluster 0.
    pub fn cluster_count(&self) -> usize {
        let mut clusters: Vec<u32> = self.indices.iter().copied().filter(|&i| i != 0).collect();
        clusters.sort_unstable();
        clusters.dedup();
        clusters.len()
    }
}

#[test]
fn test_cut() {
    let cut = Cut::from_text(2, "n_clusters: 3\nExact_cut_for: rec spikes: 6\n0 1 1 4 0 4\n").unwrap();

    assert_eq!(cut.channel_group_id(), 2);
    assert_eq!(cut.indices(), &[0, 1, 1, 4, 0, 4]);
    assert_eq!(cut.len(), 6);
    assert_eq!(cut.declared_spike_count(), Some(6));
    assert_eq!(cut.cluster_count(), 2);
}
