/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Baseline schedulers used for comparison runs.
//!
//! All three take the same [`Workload`] as the hybrid scheduler and produce
//! the same compact assignment, so the facade evaluates them through the one
//! [`Workload::evaluate`] path and the reliability definition is shared.
//! They exist to be compared against — none of them is the production
//! algorithm.

use crate::workload::{Assignment, Workload};

/// First-come-first-served over a simulated load tracker.
///
/// Tasks are visited in input order; each picks the node with the smallest
/// simulated load (earliest-seen node wins ties), then bumps that node's
/// load by a tenth of the task's delay there.  Loads start from each node's
/// real `current_load`, so a busy node begins the run handicapped.
pub fn fcfs(workload: &Workload<'_>) -> Assignment {
    let m = workload.node_count();
    let mut simulated: Vec<f64> = (0..m).map(|j| workload.node(j).current_load).collect();

    (0..workload.task_count())
        .map(|i| {
            let mut chosen = 0;
            for j in 1..m {
                if simulated[j] < simulated[chosen] {
                    chosen = j;
                }
            }
            simulated[chosen] += workload.delay(i, chosen) * 0.1;
            chosen
        })
        .collect()
}

/// Round-robin: task `i` goes to node `i mod m`.
pub fn round_robin(workload: &Workload<'_>) -> Assignment {
    let m = workload.node_count();
    (0..workload.task_count()).map(|i| i % m).collect()
}

/// Min-Min: smallest tasks first, each to the node minimising its delay plus
/// the load accumulated on that node so far.
///
/// The task order is a sorted copy — the returned assignment is still
/// indexed by the original task positions.
pub fn min_min(workload: &Workload<'_>) -> Assignment {
    let n = workload.task_count();
    let m = workload.node_count();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        workload
            .task(a)
            .data_size_mbits
            .partial_cmp(&workload.task(b).data_size_mbits)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut accumulated = vec![0.0; m];
    let mut assignment = vec![0; n];
    for &i in &order {
        let mut chosen = 0;
        let mut best = workload.delay(i, 0) + accumulated[0];
        for j in 1..m {
            let cost = workload.delay(i, j) + accumulated[j];
            if cost < best {
                best = cost;
                chosen = j;
            }
        }
        accumulated[chosen] += workload.delay(i, chosen);
        assignment[i] = chosen;
    }
    assignment
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FogNode, Task, TerminalDevice};

    fn device(id: &str) -> TerminalDevice {
        TerminalDevice {
            id: id.into(),
            transmission_power_w: 0.1,
            idle_power_w: 0.05,
            mobile: false,
            delay_weight: 1.0,
            energy_weight: 0.0,
            residual_energy_j: f64::INFINITY,
        }
    }

    fn task(id: &str, size_mbits: f64) -> Task {
        Task {
            id: id.into(),
            data_size_mbits: size_mbits,
            cycles_per_bit: 200.0,
            max_tolerance_s: 60.0,
            expected_completion_s: 30.0,
            device_id: "d".into(),
            priority: 1,
        }
    }

    fn node(id: &str, load: f64) -> FogNode {
        FogNode {
            id: id.into(),
            cycles_per_s: 2.0e9,
            storage_gb: 500.0,
            bandwidth_mbps: 100.0,
            current_load: load,
        }
    }

    #[test]
    fn round_robin_cycles_through_nodes() {
        // Three tasks over [A, B] → t0→A, t1→B, t2→A.
        let tasks = [task("t0", 1.0), task("t1", 1.0), task("t2", 1.0)];
        let nodes = [node("A", 0.0), node("B", 0.0)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();
        assert_eq!(round_robin(&wl), vec![0, 1, 0]);
    }

    #[test]
    fn round_robin_single_node_assigns_everything_there() {
        let tasks = [task("t0", 1.0), task("t1", 2.0)];
        let nodes = [node("only", 0.0)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();
        assert_eq!(round_robin(&wl), vec![0, 0]);
    }

    #[test]
    fn fcfs_starts_from_real_node_loads() {
        // Node A starts busier than B, so the first task lands on B.
        let tasks = [task("t0", 1.0)];
        let nodes = [node("A", 0.5), node("B", 0.1)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();
        assert_eq!(fcfs(&wl), vec![1]);
    }

    #[test]
    fn fcfs_breaks_ties_toward_the_earliest_node() {
        let tasks = [task("t0", 1.0)];
        let nodes = [node("A", 0.2), node("B", 0.2)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();
        assert_eq!(fcfs(&wl), vec![0]);
    }

    #[test]
    fn fcfs_accumulates_a_tenth_of_the_delay() {
        // Two identical tasks, identical idle nodes: the first goes to A and
        // bumps its simulated load, pushing the second to B.
        let tasks = [task("t0", 10.0), task("t1", 10.0)];
        let nodes = [node("A", 0.0), node("B", 0.0)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();
        assert_eq!(fcfs(&wl), vec![0, 1]);
    }

    #[test]
    fn min_min_processes_smallest_data_first() {
        // Sizes [50, 10, 30] are visited as 10, 30, 50.  All nodes equal:
        // the smallest task takes A, the next lands on B (A now carries the
        // small task's delay), the largest returns to whichever accumulated
        // less.
        let tasks = [task("big", 50.0), task("small", 10.0), task("mid", 30.0)];
        let nodes = [node("A", 0.0), node("B", 0.0)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();

        let assignment = min_min(&wl);

        // small → A (first pick on empty loads)
        assert_eq!(assignment[1], 0);
        // mid → B: A already carries small's delay
        assert_eq!(assignment[2], 1);
        // big → A: delay(A) + small's delay < delay(B) + mid's delay
        let a_cost = wl.delay(0, 0) + wl.delay(1, 0);
        let b_cost = wl.delay(0, 1) + wl.delay(2, 1);
        let expected = if a_cost < b_cost { 0 } else { 1 };
        assert_eq!(assignment[0], expected);
    }

    #[test]
    fn min_min_assignment_is_indexed_by_input_order() {
        let tasks = [task("big", 50.0), task("small", 10.0)];
        let nodes = [node("A", 0.0)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();
        let assignment = min_min(&wl);
        assert_eq!(assignment.len(), 2);
        assert!(assignment.iter().all(|&j| j == 0));
    }

    #[test]
    fn all_baselines_return_valid_indices() {
        let tasks = [task("t0", 5.0), task("t1", 1.0), task("t2", 9.0), task("t3", 3.0)];
        let nodes = [node("A", 0.0), node("B", 0.3), node("C", 0.6)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();

        for assignment in [fcfs(&wl), round_robin(&wl), min_min(&wl)] {
            assert_eq!(assignment.len(), 4);
            assert!(assignment.iter().all(|&j| j < 3));
        }
    }

    #[test]
    fn baselines_share_the_engine_reliability_definition() {
        let tasks = [task("t0", 10.0), task("t1", 2.0)];
        let nodes = [node("A", 0.0), node("B", 0.0)];
        let devices = [device("d")];
        let wl = Workload::new(&tasks, &nodes, &devices).unwrap();

        let alloc = wl.evaluate(&round_robin(&wl)).unwrap();
        assert!((0.0..=100.0).contains(&alloc.reliability));
    }
}
