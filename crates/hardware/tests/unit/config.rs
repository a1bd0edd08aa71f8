//! Configuration defaults, JSON parsing and validation.

use simt_core::common::ConfigError;
use simt_core::config::{ArbiterPolicy, Config, IssuePolicy};

#[test]
fn defaults_describe_the_baseline_machine() {
    let config = Config::default();
    assert_eq!(config.general.start_pc, 0x1000);
    assert_eq!(config.general.warp_count, 32);
    assert_eq!(config.group_count(), 16);
    assert_eq!(config.scheduler.policy, IssuePolicy::RoundRobin);
    assert!(!config.scheduler.barrier);
    assert_eq!(config.icache.block_bytes, 32);
    assert_eq!(config.icache.fetch_queue, 32);
    assert_eq!(config.dcache.block_bytes, 128);
    assert_eq!(config.dcache.banks, 2);
    assert_eq!(config.memory.arbiter, ArbiterPolicy::RoundRobin);
    assert!(config.validate().is_ok());
}

#[test]
fn odd_warp_count_rounds_group_count_up() {
    let mut config = Config::default();
    config.general.warp_count = 5;
    assert_eq!(config.group_count(), 3);
}

#[test]
fn empty_json_is_the_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.general.warp_count, Config::default().general.warp_count);
    assert_eq!(config.execute.mul, Config::default().execute.mul);
}

#[test]
fn json_overrides_only_named_fields() {
    let config = Config::from_json(
        r#"{
            "general": { "warp_count": 4, "trace": true },
            "scheduler": { "policy": "greedy_then_oldest", "barrier": true },
            "dcache": { "banks": 4 },
            "execute": { "mul": 7 },
            "memory": { "latency": 11, "arbiter": "icache_priority" }
        }"#,
    )
    .unwrap();
    assert_eq!(config.general.warp_count, 4);
    assert!(config.general.trace);
    assert_eq!(config.general.start_pc, 0x1000);
    assert_eq!(config.scheduler.policy, IssuePolicy::GreedyThenOldest);
    assert!(config.scheduler.barrier);
    assert_eq!(config.dcache.banks, 4);
    assert_eq!(config.dcache.ways, 8);
    assert_eq!(config.execute.mul, 7);
    assert_eq!(config.execute.div, 8);
    assert_eq!(config.memory.latency, 11);
    assert_eq!(config.memory.arbiter, ArbiterPolicy::IcachePriority);
}

#[test]
fn policy_aliases() {
    let rr = Config::from_json(r#"{ "scheduler": { "policy": "rr" } }"#).unwrap();
    assert_eq!(rr.scheduler.policy, IssuePolicy::RoundRobin);
    let gto = Config::from_json(r#"{ "scheduler": { "policy": "gto" } }"#).unwrap();
    assert_eq!(gto.scheduler.policy, IssuePolicy::GreedyThenOldest);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json("{ general: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = Config::from_json(r#"{ "general": { "warp_count": "many" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

fn invalid_field(json: &str) -> &'static str {
    match Config::from_json(json) {
        Err(ConfigError::Invalid { field, .. }) => field,
        other => panic!("expected Invalid for {json}, got {other:?}"),
    }
}

#[test]
fn validation_rejects_unbuildable_geometry() {
    assert_eq!(invalid_field(r#"{ "general": { "warp_count": 0 } }"#), "general.warp_count");
    assert_eq!(invalid_field(r#"{ "general": { "warp_count": 10000 } }"#), "general.warp_count");
    assert_eq!(invalid_field(r#"{ "general": { "start_pc": 4098 } }"#), "general.start_pc");
    assert_eq!(invalid_field(r#"{ "icache": { "block_bytes": 24 } }"#), "block_bytes");
    assert_eq!(invalid_field(r#"{ "icache": { "ways": 0 } }"#), "ways");
    assert_eq!(invalid_field(r#"{ "icache": { "fetch_queue": 0 } }"#), "fetch_queue");
    assert_eq!(invalid_field(r#"{ "dcache": { "banks": 3 } }"#), "dcache.banks");
    assert_eq!(invalid_field(r#"{ "lsu": { "queue_size": 0 } }"#), "lsu.queue_size");
    assert_eq!(invalid_field(r#"{ "issue": { "ibuffer_depth": 0 } }"#), "issue.ibuffer_depth");
    assert_eq!(invalid_field(r#"{ "memory": { "latency": 0 } }"#), "memory.latency");
}

#[test]
fn invalid_error_names_the_cache() {
    let err = Config::from_json(r#"{ "dcache": { "ways": 0 } }"#).unwrap_err();
    assert!(err.to_string().contains("dcache"), "{err}");
}
