use anyhow::Result;
use subgroup_beam::data::model::AttributeValue::{Bool, Categorical, Numeric};
use subgroup_beam::search::quality::split_entropy;
use subgroup_beam::{Dataset, SearchConfig, SubgroupDiscovery, TargetSpec};

fn config(width: usize, depth: usize, results: usize) -> SearchConfig {
    SearchConfig {
        width,
        depth,
        results,
        bins: 5,
        condition: "C".into(),
        outcome: "D".into(),
        targets: TargetSpec::default(),
    }
}

/// `A` splits off a subgroup with a perfectly positive C ↔ D association
/// while the remaining records are perfectly negative. `B` is constant.
fn boolean_table() -> Result<Dataset> {
    let mut rows = Vec::new();
    let mut add = |a: Option<bool>, c: bool, d: bool, n: usize| {
        for _ in 0..n {
            rows.push(vec![a.map(Bool), Some(Bool(true)), Some(Bool(c)), Some(Bool(d))]);
        }
    };
    // A = true: n1 = 2, n4 = 2
    add(Some(true), true, false, 2);
    add(Some(true), false, true, 2);
    // A = false: n2 = 2, n3 = 2
    add(Some(false), true, true, 2);
    add(Some(false), false, false, 2);
    // A missing
    add(None, true, true, 4);
    add(None, false, false, 4);

    Ok(Dataset::from_columns(
        vec!["A".into(), "B".into(), "C".into(), "D".into()],
        rows,
    )?)
}

#[test]
fn strongest_association_gap_wins() -> Result<()> {
    let cfg = config(2, 1, 5);
    let ds = cfg.reserve_targets(boolean_table()?)?;
    let run = SubgroupDiscovery::new(&ds, &cfg)?;
    let items = run.run()?;

    assert_eq!(items.len(), 4);
    assert_eq!(items[0].description.to_string(), "A == true");
    let expected = (1.0f64 - (-1.0)).abs() * split_entropy(4, 16);
    assert!((items[0].quality - expected).abs() < 1e-12);

    assert_eq!(items[1].description.to_string(), "A == false");
    assert!(items[0].quality > items[1].quality);
    // outside of A == false: n1 = n4 = 2, n2 = n3 = 4, so Q = (4 − 16) / (4 + 16)
    let expected_false = (-1.0f64 - (-0.6)).abs() * split_entropy(4, 16);
    assert!((items[1].quality - expected_false).abs() < 1e-12);

    // B splits nothing off: one side is empty, so its Q is 0/0
    assert!(items[2..].iter().all(|i| i.quality.is_nan()));
    assert!(items[2..].iter().all(|i| i.description.to_string().starts_with("B == ")));
    Ok(())
}

#[test]
fn depth_zero_finds_nothing() -> Result<()> {
    let cfg = config(2, 0, 5);
    let ds = cfg.reserve_targets(boolean_table()?)?;
    assert!(SubgroupDiscovery::new(&ds, &cfg)?.run()?.is_empty());
    Ok(())
}

#[test]
fn zero_result_capacity_finds_nothing() -> Result<()> {
    let cfg = config(2, 2, 0);
    let ds = cfg.reserve_targets(boolean_table()?)?;
    assert!(SubgroupDiscovery::new(&ds, &cfg)?.run()?.is_empty());
    Ok(())
}

/// Page views where the variant helps everyone except mobile users.
fn mixed_table() -> Result<Dataset> {
    let devices = ["Computer", "Mobile", "Tablet"];
    let mut rows = Vec::new();
    for i in 0..240usize {
        let device = devices[i % 3];
        let variant = (i / 3) % 2 == 0;
        let bucket = (i / 6) % 4;
        let likely = if device == "Mobile" { bucket == 0 } else { bucket != 3 };
        let clicked = likely == variant;
        let height = if i % 7 == 0 { None } else { Some(Numeric(480.0 + (i % 5) as f64 * 120.0)) };
        rows.push(vec![
            Some(Categorical(device.to_string())),
            height,
            Some(Bool(i % 4 != 0)),
            Some(Bool(variant)),
            Some(Bool(clicked)),
        ]);
    }
    Ok(Dataset::from_columns(
        vec![
            "dvce_type".into(),
            "browser_viewheight".into(),
            "browser_cookies".into(),
            "C".into(),
            "D".into(),
        ],
        rows,
    )?)
}

#[test]
fn deeper_search_respects_invariants() -> Result<()> {
    let cfg = config(3, 3, 8);
    let ds = cfg.reserve_targets(mixed_table()?)?;
    let run = SubgroupDiscovery::new(&ds, &cfg)?;
    let items = run.run()?;

    assert!(!items.is_empty() && items.len() <= 8);
    let real: Vec<f64> = items.iter().map(|i| i.quality).filter(|q| !q.is_nan()).collect();
    assert!(real.windows(2).all(|w| w[0] >= w[1]));

    for item in &items {
        let conditions = item.description.conditions();
        assert!(!conditions.is_empty() && conditions.len() <= 3);
        let mut attrs: Vec<&str> = conditions.iter().map(|c| c.attribute()).collect();
        attrs.sort_unstable();
        attrs.dedup();
        assert_eq!(attrs.len(), conditions.len());
        assert!(attrs.iter().all(|a| *a != "C" && *a != "D"));
    }
    Ok(())
}

#[test]
fn planted_device_subgroup_ranks_first_at_depth_one() -> Result<()> {
    let cfg = config(5, 1, 5);
    let ds = cfg.reserve_targets(mixed_table()?)?;
    let items = SubgroupDiscovery::new(&ds, &cfg)?.run()?;

    // `== Mobile` and `!= Mobile` split the table identically
    let top = items[0].description.to_string();
    assert!(
        top == "dvce_type == Mobile" || top == "dvce_type != Mobile",
        "unexpected top subgroup {top}"
    );
    Ok(())
}

#[test]
fn subgroup_sizes_match_partitions() -> Result<()> {
    let cfg = config(2, 1, 5);
    let ds = cfg.reserve_targets(boolean_table()?)?;
    let run = SubgroupDiscovery::new(&ds, &cfg)?;
    let items = run.run()?;
    let findings = subgroup_beam::report::findings(&run, &items);

    assert_eq!(findings[0].description, "A == true");
    assert_eq!(findings[0].size, 4);
    assert!(findings[0].quality.is_some());
    assert!(findings.iter().any(|f| f.description == "B == false" && f.size == 0));
    Ok(())
}
