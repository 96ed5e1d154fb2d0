//! Cluster Metrics Example
//!
//! This example demonstrates how to score a fixed clustering with
//! sum-of-squares metrics and the silhouette coefficient.
//!
//! Run with: cargo run --example cluster_metrics

use market_analytics::clustering::{ClusterMetric, ClusterReport};
use market_analytics::core::{ClusterAssignment, ClusterCenters, PointSet};

fn main() {
    println!("=== Cluster Metrics Example ===\n");

    let points = PointSet::new(vec![
        vec![1.0, 2.0],
        vec![1.5, 1.8],
        vec![1.2, 2.2],
        vec![8.0, 8.0],
        vec![8.5, 7.5],
        vec![7.8, 8.3],
        vec![4.0, 9.0],
    ])
    .unwrap();

    // Labels are opaque; pairs need not be in index order.
    let assignment = ClusterAssignment::from_pairs(
        vec![
            (0, "low"),
            (1, "low"),
            (2, "low"),
            (6, "high"),
            (3, "high"),
            (4, "high"),
            (5, "high"),
        ],
        points.len(),
    )
    .unwrap();

    // =========================================================================
    // Derived centers
    // =========================================================================
    println!("--- Centers derived from cluster means ---\n");
    let report = ClusterReport::evaluate(&points, &assignment, None).unwrap();
    for (label, center) in &report.centers {
        println!("  {:<5} {:.3?}  cohesion {:.4}", label, center, report.cohesion[label]);
    }
    println!("\n  WSS = {:.4}", report.wss);
    println!("  BSS = {:.4}", report.bss);
    println!("  TSS = {:.4}", report.tss);
    println!("  BSS/TSS = {:.4}", report.explained_ratio());

    // =========================================================================
    // Supplied centers
    // =========================================================================
    println!("\n--- Supplied centers (e.g. from a k-means run) ---\n");
    let mut centers = ClusterCenters::new();
    centers.insert("low", vec![1.0, 2.0]);
    centers.insert("high", vec![8.0, 8.0]);

    for metric in [
        ClusterMetric::Wss,
        ClusterMetric::Bss,
        ClusterMetric::Tss,
        ClusterMetric::Separation,
        ClusterMetric::Silhouette,
    ] {
        let value = metric.compute(&points, &assignment, Some(&centers)).unwrap();
        println!("  {:<12} {:.4}", format!("{:?}", metric), value);
    }
}
