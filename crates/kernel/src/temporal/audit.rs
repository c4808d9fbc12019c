use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::ids::{ElementId, VertexId};
use super::net::TriangleNet4d;
use crate::traits::Element4d;

/// A single structural problem found in a net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuditFinding {
    /// Intervals `index` and `index + 1` overlap or leave a gap.
    IntervalsNotTiled { index: usize },
    /// First interval does not start at the net start, or the last one
    /// does not end at the net end.
    IntervalBoundsMismatch,
    /// Epoch count differs from the change timestamp count.
    EpochsOutOfStep { epochs: usize, changes: usize },
    TimestepsOutOfOrder { step: usize },
    ElementVertexWithoutTube { element: ElementId, vertex: VertexId },
    TubeNotContiguous { vertex: VertexId },
}

/// Result of [`audit_net`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetAudit {
    pub intervals_tiled: bool,
    pub epochs_in_step: bool,
    pub timesteps_ordered: bool,
    pub elements_resolved: bool,
    /// Informational: tubes with gaps are legal for reappearing vertices.
    pub gapped_tubes: usize,
    pub findings: Vec<AuditFinding>,
}

impl NetAudit {
    pub fn all_valid(&self) -> bool {
        self.intervals_tiled && self.epochs_in_step && self.timesteps_ordered && self.elements_resolved
    }
}

#[instrument(skip(net))]
pub fn audit_net(net: &TriangleNet4d) -> NetAudit {
    let mut findings = Vec::new();

    // Intervals: consecutive, non-overlapping, spanning [start, end).
    let intervals: Vec<_> = net.intervals().copied().collect();
    let mut intervals_tiled = true;
    for (index, pair) in intervals.windows(2).enumerate() {
        if pair[0].end != Some(pair[1].start) {
            intervals_tiled = false;
            findings.push(AuditFinding::IntervalsNotTiled { index });
        }
    }
    let starts_at_net = intervals.first().is_some_and(|i| i.start == net.start());
    let ends_at_net = intervals.last().is_some_and(|i| i.end == net.end());
    if !starts_at_net || !ends_at_net {
        intervals_tiled = false;
        findings.push(AuditFinding::IntervalBoundsMismatch);
    }

    let epochs_in_step = net.epochs.len() == net.change_timestamps().len()
        && net
            .epochs
            .iter()
            .zip(net.change_timestamps())
            .all(|(epoch, &at)| epoch.changed_at == Some(at));
    if !epochs_in_step {
        findings.push(AuditFinding::EpochsOutOfStep {
            epochs: net.epochs.len(),
            changes: net.change_timestamps().len(),
        });
    }

    let mut timesteps_ordered = true;
    for (i, pair) in net.timesteps().windows(2).enumerate() {
        if pair[1] < pair[0] {
            timesteps_ordered = false;
            findings.push(AuditFinding::TimestepsOutOfOrder { step: i + 1 });
        }
    }

    let mut elements_resolved = true;
    let store = net.store();
    for epoch in &net.epochs {
        let vertex_refs = epoch
            .elements
            .values()
            .map(|e| (e.id(), e.vertex_ids().to_vec()))
            .chain(epoch.boundary.values().map(|e| (e.id(), e.vertex_ids().to_vec())));
        for (element, vertices) in vertex_refs {
            for vertex in vertices {
                if store.tube(vertex).is_none() {
                    elements_resolved = false;
                    findings.push(AuditFinding::ElementVertexWithoutTube { element, vertex });
                }
            }
        }
    }

    let mut gapped_tubes = 0;
    for vertex in store.vertex_ids() {
        if store.tube(vertex).is_some_and(|tube| !tube.is_contiguous()) {
            gapped_tubes += 1;
            findings.push(AuditFinding::TubeNotContiguous { vertex });
        }
    }

    let audit = NetAudit {
        intervals_tiled,
        epochs_in_step,
        timesteps_ordered,
        elements_resolved,
        gapped_tubes,
        findings,
    };
    info!(
        intervals_tiled = audit.intervals_tiled,
        epochs_in_step = audit.epochs_in_step,
        timesteps_ordered = audit.timesteps_ordered,
        elements_resolved = audit.elements_resolved,
        finding_count = audit.findings.len(),
        "net audit complete"
    );
    audit
}
