use approx::assert_relative_eq;
use rlst::{c64, RawAccess};

use butterfly::{
    oracle,
    traits::{
        butterfly::{DataAccess, Evaluate},
        tree::{ButterflyTree, SingleTree, TreeNode},
        types::Operator,
    },
    traversal::{dispatch::schedule, types::Coordinates},
    tree::helpers::{
        charges_fixture, clustered_points_fixture, grid_points_fixture, points_fixture,
    },
    Butterfly, ButterflyBuilder, ButterflyError, FourierKernel,
};

extern crate blas_src;
extern crate lapack_src;

fn build(
    sources: &Coordinates,
    targets: &Coordinates,
    charges: &[c64],
    leaf_capacity: usize,
    order: usize,
    kernel: FourierKernel,
) -> Result<Butterfly<FourierKernel>, ButterflyError> {
    ButterflyBuilder::new()
        .tree(sources, targets, leaf_capacity)?
        .parameters(charges, order, kernel)?
        .build()
}

fn check_accuracy(
    butterfly: &Butterfly<FourierKernel>,
    sources: &Coordinates,
    targets: &Coordinates,
    charges: &[c64],
    tolerance: f64,
) {
    let result = butterfly.results();
    let (report, _) = oracle::verify(
        butterfly.kernel(),
        sources.data(),
        charges,
        targets.data(),
        &result,
    )
    .unwrap();

    assert_eq!(report.degenerate_targets, 0);
    assert!(
        report.vector_relative_error < tolerance,
        "vector relative error {} exceeds {}",
        report.vector_relative_error,
        tolerance
    );
    assert!(report.maximum_relative_error.is_finite());
}

#[test]
fn test_accuracy_1d() {
    let n = 64;
    let sources = points_fixture::<f64>(n, 1, None, None, Some(0));
    let targets = points_fixture::<f64>(n, 1, None, None, Some(1));
    let charges = charges_fixture(n, Some(2));

    let mut butterfly = build(
        &sources,
        &targets,
        &charges,
        16,
        10,
        FourierKernel::new(1, 2.0),
    )
    .unwrap();
    butterfly.evaluate().unwrap();

    check_accuracy(&butterfly, &sources, &targets, &charges, 1e-6);
}

#[test]
fn test_accuracy_2d() {
    let n = 400;
    let sources = points_fixture::<f64>(n, 2, None, None, Some(3));
    let targets = points_fixture::<f64>(n, 2, None, None, Some(4));
    let charges = charges_fixture(n, Some(5));

    let mut butterfly = build(
        &sources,
        &targets,
        &charges,
        16,
        8,
        FourierKernel::new(2, 1.0),
    )
    .unwrap();
    butterfly.evaluate().unwrap();

    check_accuracy(&butterfly, &sources, &targets, &charges, 1e-6);
}

#[test]
fn test_accuracy_adaptive() {
    let n = 300;
    let sources = clustered_points_fixture(n, 1, 10, 0.02, Some(6));
    let targets = clustered_points_fixture(n, 1, 10, 0.02, Some(7));
    let charges = charges_fixture(n, Some(8));

    let mut butterfly = build(
        &sources,
        &targets,
        &charges,
        8,
        10,
        FourierKernel::new(1, 1.0),
    )
    .unwrap();

    // Coarse leaves on both sides exercise direct injection and completion
    let operators = &butterfly.operators;
    assert!(operators.orphans.iter().any(|orphans| !orphans.is_empty()));

    let source_tree = &operators.tree.source_tree;
    let target_tree = &operators.tree.target_tree;
    let mut dispatched = Vec::new();
    for level in 0..=operators.max_level {
        for interaction in schedule(
            source_tree,
            target_tree,
            level,
            operators.split_level,
            operators.max_level,
        )
        .unwrap()
        {
            dispatched.push(interaction.dispatch.source);
            dispatched.extend(interaction.dispatch.crossover);
            dispatched.extend(interaction.dispatch.target);
        }
    }
    for operator in [
        Operator::S2M,
        Operator::M2M,
        Operator::S2L,
        Operator::M2L,
        Operator::L2L,
        Operator::M2T,
        Operator::L2T,
    ] {
        assert!(dispatched.contains(&operator), "{} never dispatched", operator);
    }

    butterfly.evaluate().unwrap();
    check_accuracy(&butterfly, &sources, &targets, &charges, 1e-6);
}

#[test]
fn test_linearity() {
    let n = 128;
    let sources = points_fixture::<f64>(n, 1, None, None, Some(9));
    let targets = points_fixture::<f64>(n, 1, None, None, Some(10));
    let charges = charges_fixture(n, Some(11));

    let mut butterfly = build(
        &sources,
        &targets,
        &charges,
        16,
        10,
        FourierKernel::new(1, 1.0),
    )
    .unwrap();
    butterfly.evaluate().unwrap();
    let result = butterfly.results();

    // Evaluating again reproduces the result
    butterfly.evaluate().unwrap();
    assert_eq!(butterfly.results(), result);

    let alpha = c64::new(2.5, -1.5);
    let scaled = charges.iter().map(|c| alpha * c).collect::<Vec<_>>();
    butterfly.clear(&scaled).unwrap();
    butterfly.evaluate().unwrap();

    for (s, r) in butterfly.results().iter().zip(&result) {
        let expected = alpha * r;
        assert_relative_eq!(s.re, expected.re, epsilon = 1e-10);
        assert_relative_eq!(s.im, expected.im, epsilon = 1e-10);
    }

    let zeros = vec![c64::new(0., 0.); n];
    butterfly.clear(&zeros).unwrap();
    butterfly.evaluate().unwrap();
    assert!(butterfly.results().iter().all(|r| *r == c64::new(0., 0.)));

    assert!(matches!(
        butterfly.clear(&zeros[1..]),
        Err(ButterflyError::ChargeMismatch { .. })
    ));
}

#[test]
fn test_degenerate_split() {
    let kernel = FourierKernel::new(1, 1.0);

    // A single box on each side
    let points = points_fixture::<f64>(16, 1, None, None, Some(12));
    let charges = charges_fixture(16, Some(13));
    let result = build(&points, &points, &charges, 16, 10, kernel);
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));

    // Two levels, so the deepest traversal level is 1
    let points = grid_points_fixture(20, 1);
    let charges = charges_fixture(20, Some(14));
    let result = build(&points, &points, &charges, 16, 10, kernel);
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_invalid_parameters() {
    let sources = points_fixture::<f64>(100, 1, None, None, Some(15));
    let targets = points_fixture::<f64>(100, 2, None, None, Some(16));
    let charges = charges_fixture(100, Some(17));

    let result = build(&sources, &targets, &charges, 16, 10, FourierKernel::new(1, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::DimensionMismatch {
            source_dim: 1,
            target_dim: 2,
            kernel_dim: 1
        })
    ));

    let result = build(&sources, &sources, &charges, 16, 10, FourierKernel::new(2, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::DimensionMismatch { .. })
    ));

    let result = build(
        &sources,
        &sources,
        &charges[..50],
        16,
        10,
        FourierKernel::new(1, 1.0),
    );
    assert!(matches!(
        result,
        Err(ButterflyError::ChargeMismatch {
            expected: 100,
            found: 50
        })
    ));

    let result = build(&sources, &sources, &charges, 16, 0, FourierKernel::new(1, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));

    let result = build(&sources, &sources, &charges, 0, 10, FourierKernel::new(1, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));

    let result = ButterflyBuilder::new().parameters(&charges, 10, FourierKernel::new(1, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_interpolation_size() {
    let n = 200;
    let points = points_fixture::<f64>(n, 6, None, None, Some(24));
    let charges = charges_fixture(n, Some(25));

    let builder = || ButterflyBuilder::new().tree(&points, &points, 16).unwrap();

    // 10^6 coefficients per box
    let result = builder().parameters(&charges, 10, FourierKernel::new(6, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));

    assert!(builder()
        .parameters(&charges, 2, FourierKernel::new(6, 1.0))
        .is_ok());

    // order^dim overflows
    let points = points_fixture::<f64>(n, 2, None, None, Some(26));
    let result = ButterflyBuilder::new()
        .tree(&points, &points, 16)
        .unwrap()
        .parameters(&charges, 1 << 40, FourierKernel::new(2, 1.0));
    assert!(matches!(
        result,
        Err(ButterflyError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_binding_sizes() {
    let n = 500;
    let sources = points_fixture::<f64>(n, 2, None, None, Some(18));
    let targets = points_fixture::<f64>(2 * n, 2, None, None, Some(19));
    let charges = charges_fixture(n, Some(20));

    let butterfly = build(
        &sources,
        &targets,
        &charges,
        10,
        4,
        FourierKernel::new(2, 1.0),
    )
    .unwrap();

    let max_level = butterfly.max_level();
    let source_tree = butterfly.tree().source_tree();
    let target_tree = butterfly.tree().target_tree();
    assert_eq!(
        max_level as usize,
        source_tree.n_levels().min(target_tree.n_levels()) - 1
    );
    assert_eq!(butterfly.ncoeffs(), 16);

    for level in 0..=max_level {
        let n_sources = source_tree.n_keys(max_level - level).unwrap();
        let n_targets = target_tree.n_keys(level).unwrap();

        assert_eq!(butterfly.multipoles().shape(level), Some((n_sources, n_targets)));
        assert_eq!(butterfly.locals().shape(level), Some((n_targets, n_sources)));

        for source in source_tree.keys(max_level - level).unwrap() {
            for target in target_tree.keys(level).unwrap() {
                let (i, j) = (source.level_index(), target.level_index());
                assert_eq!(butterfly.multipole(level, i, j).unwrap().len(), 16);
                assert_eq!(butterfly.local(level, j, i).unwrap().len(), 16);
            }
        }

        assert!(butterfly.multipole(level, n_sources, 0).is_none());
        assert!(butterfly.local(level, 0, n_sources).is_none());
    }
}

#[test]
fn test_dispatch() {
    let n = 300;
    let sources = clustered_points_fixture(n, 1, 10, 0.02, Some(21));
    let targets = points_fixture::<f64>(n, 1, None, None, Some(22));
    let charges = charges_fixture(n, Some(23));

    let butterfly = build(
        &sources,
        &targets,
        &charges,
        8,
        6,
        FourierKernel::new(1, 1.0),
    )
    .unwrap();

    let max_level = butterfly.max_level();
    let split_level = butterfly.split_level();
    assert!(0 < split_level && split_level < max_level);

    let source_tree = butterfly.tree().source_tree();
    let target_tree = butterfly.tree().target_tree();

    for level in 0..=max_level {
        let interactions =
            schedule(source_tree, target_tree, level, split_level, max_level).unwrap();
        assert_eq!(
            interactions.len(),
            source_tree.n_keys(max_level - level).unwrap() * target_tree.n_keys(level).unwrap()
        );

        for interaction in interactions {
            let source = source_tree
                .node(max_level - level, interaction.source_index)
                .unwrap();
            let target = target_tree.node(level, interaction.target_index).unwrap();
            let dispatch = interaction.dispatch;

            // Leaves are never aggregated or redistributed from children
            if source.is_leaf() {
                assert!(dispatch.source != Operator::M2M && dispatch.source != Operator::L2L);
            }

            if level <= split_level {
                assert!(matches!(dispatch.source, Operator::S2M | Operator::M2M));
            } else {
                assert!(matches!(dispatch.source, Operator::S2L | Operator::L2L));
            }

            assert_eq!(dispatch.crossover.is_some(), level == split_level);
            assert_eq!(
                dispatch.target.is_some(),
                level == max_level || target.is_leaf()
            );
        }
    }

    assert!(schedule(source_tree, target_tree, max_level + 1, split_level, max_level).is_err());
}
