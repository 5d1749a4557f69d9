// Integration tests for backbone planning
//
// Checks the planner against brute-force enumeration of spanning trees on
// small complete graphs, and covers users, gateways and disconnected layouts.

use cdnsim_core::{BackboneError, CdnSimulator, NodeId, NodeRole};
use proptest::prelude::*;

/// Every unordered pair of `ids`
fn all_pairs(ids: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    let mut pairs = Vec::new();
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}

fn find(parent: &mut [usize], x: usize) -> usize {
    let mut root = x;
    while parent[root] != root {
        root = parent[root];
    }
    parent[x] = root;
    root
}

/// Minimum spanning tree weight by trying every edge subset of size n - 1
fn brute_force_mst(node_count: usize, edges: &[(usize, usize, u32)]) -> u64 {
    let mut best = u64::MAX;
    for mask in 0u32..(1 << edges.len()) {
        if mask.count_ones() as usize != node_count - 1 {
            continue;
        }
        let mut parent: Vec<usize> = (0..node_count).collect();
        let mut total = 0u64;
        let mut acyclic = true;
        for (bit, &(a, b, w)) in edges.iter().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra == rb {
                acyclic = false;
                break;
            }
            parent[ra] = rb;
            total += u64::from(w);
        }
        if acyclic {
            best = best.min(total);
        }
    }
    best
}

/// Complete graph over ids 1..=n with node 1 as origin, others alternating roles
fn complete_backbone(n: usize, weights: &[u32]) -> CdnSimulator {
    let mut sim = CdnSimulator::new();
    let ids: Vec<NodeId> = (1..=n as NodeId).collect();
    for &id in &ids {
        let role = match id {
            1 => NodeRole::Origin,
            id if id % 2 == 0 => NodeRole::EdgeServer,
            _ => NodeRole::Gateway,
        };
        sim.add_node(id, role, 2).unwrap();
    }
    for (&(a, b), &w) in all_pairs(&ids).iter().zip(weights) {
        sim.add_edge(a, b, w).unwrap();
    }
    sim
}

fn expected_weight(n: usize, weights: &[u32]) -> u64 {
    let ids: Vec<NodeId> = (1..=n as NodeId).collect();
    let edges: Vec<(usize, usize, u32)> = all_pairs(&ids)
        .iter()
        .zip(weights)
        .map(|(&(a, b), &w)| (a as usize - 1, b as usize - 1, w))
        .collect();
    brute_force_mst(n, &edges)
}

#[test]
fn test_four_node_backbone_matches_brute_force() {
    // Distinct weights on the 6 edges of K4
    let weights: [u32; 6] = [7, 3, 9, 4, 8, 2];
    let sim = complete_backbone(4, &weights);

    let plan = sim.compute_backbone().unwrap();
    assert_eq!(plan.node_count, 4);
    assert_eq!(plan.edge_count(), 3);
    assert!(plan.is_spanning());
    assert_eq!(plan.total_cost, expected_weight(4, &weights));
    assert_eq!(plan.total_cost, 9);
}

#[test]
fn test_edges_are_listed_in_discovery_order() {
    let weights: [u32; 6] = [7, 3, 9, 4, 8, 2];
    let sim = complete_backbone(4, &weights);
    let plan = sim.compute_backbone().unwrap();

    // Each edge starts from a node that an earlier edge (or the root) reached
    let mut reached = vec![1];
    for edge in &plan.edges {
        assert!(reached.contains(&edge.from));
        assert!(!reached.contains(&edge.to));
        reached.push(edge.to);
    }
}

#[test]
fn test_users_never_join_the_backbone() {
    let weights: [u32; 6] = [7, 3, 9, 4, 8, 2];
    let mut sim = complete_backbone(4, &weights);
    sim.add_user(100, 1, 1).unwrap();
    sim.add_user(101, 2, 1).unwrap();

    let plan = sim.compute_backbone().unwrap();
    assert_eq!(plan.node_count, 4);
    assert!(plan.edges.iter().all(|e| e.to < 100 && e.from < 100));
    assert_eq!(plan.total_cost, 9);
}

#[test]
fn test_backbone_without_origin() {
    let mut sim = CdnSimulator::new();
    sim.add_node(2, NodeRole::EdgeServer, 1).unwrap();
    sim.add_node(3, NodeRole::Gateway, 0).unwrap();
    sim.add_edge(2, 3, 4).unwrap();

    assert_eq!(sim.compute_backbone(), Err(BackboneError::NoOrigin));
}

#[test]
fn test_disconnected_backbone_reports_partial_tree() {
    let mut sim = CdnSimulator::new();
    sim.add_node(1, NodeRole::Origin, 0).unwrap();
    sim.add_node(2, NodeRole::EdgeServer, 1).unwrap();
    sim.add_node(3, NodeRole::Gateway, 0).unwrap();
    sim.add_edge(1, 2, 6).unwrap();

    let plan = sim.compute_backbone().unwrap();
    assert_eq!(plan.node_count, 3);
    assert_eq!(plan.edge_count(), 1);
    assert_eq!(plan.total_cost, 6);
    assert!(!plan.is_spanning());
}

proptest! {
    #[test]
    fn prop_four_node_backbone_is_minimal(weights in prop::collection::vec(0u32..100, 6)) {
        let sim = complete_backbone(4, &weights);
        let plan = sim.compute_backbone().unwrap();
        prop_assert!(plan.is_spanning());
        prop_assert_eq!(plan.total_cost, expected_weight(4, &weights));
    }

    #[test]
    fn prop_five_node_backbone_is_minimal(weights in prop::collection::vec(1u32..50, 10)) {
        let sim = complete_backbone(5, &weights);
        let plan = sim.compute_backbone().unwrap();
        prop_assert_eq!(plan.edge_count(), 4);
        prop_assert_eq!(plan.total_cost, expected_weight(5, &weights));
    }
}
