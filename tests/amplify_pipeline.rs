use amptune::amplify::{
    amplify_window, rasterize_window, rms, AmplifyParams, ProcessingMode, Transition,
    TransitionMode,
};
use amptune::data::{open_segy, write_segy, Point, SeismicGrid, SegyTemplate, SegyWriter, Shape};
use approx::assert_relative_eq;

/// Noise-like section with a loud patch on traces 8..=20, samples 40..60.
fn section(shape: Shape) -> SeismicGrid {
    let mut grid = SeismicGrid::filled(shape, 0.0);
    for t in 0..shape.n_traces {
        for (s, v) in grid.trace_mut(t).iter_mut().enumerate() {
            let base = ((t * 31 + s * 17) % 23) as f32 / 11.0 - 1.0;
            let loud = (8..=20).contains(&t) && (40..60).contains(&s);
            *v = if loud { base * 5.0 } else { base };
        }
    }
    grid
}

#[test]
fn scale_then_save_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("line.sgy");
    let processed = dir.path().join("line_scaled.sgy");
    let shape = Shape::new(40, 100);
    let grid = section(shape);
    SegyWriter::with_template(&original, SegyTemplate::synthetic(40, 100, 0.002).unwrap())
        .write_file(&grid, 0.002)
        .unwrap();

    let reader = open_segy(&original).unwrap();
    let dt_ms = (reader.dt() * 1000.0) as f32;
    let points = [Point::new(10, 60.0), Point::new(25, 140.0)];
    let params = AmplifyParams {
        mode: ProcessingMode::Scale { factor: 2.0 },
        transition: Transition::default(),
    };
    let result = amplify_window(reader.traces(), dt_ms, &points, &params).unwrap();
    write_segy(&processed, &original, &result.output, reader.dt()).unwrap();

    let reloaded = open_segy(&processed).unwrap();
    assert_eq!(reloaded.num_traces(), 40);
    for (&a, &b) in reloaded.traces().as_slice().iter().zip(result.output.as_slice()) {
        assert_relative_eq!(a, b, max_relative = 2e-6);
    }
    // Untouched corner stays bit-identical.
    assert_eq!(reloaded.traces()[(0, 0)], reader.traces()[(0, 0)]);
}

#[test]
fn align_suppresses_a_loud_patch() {
    let shape = Shape::new(30, 100);
    let grid = section(shape);
    let dt_ms = 2.0;
    // Window covers exactly the loud patch.
    let points = [Point::new(8, 80.0), Point::new(20, 118.0)];
    let window = rasterize_window(shape, &points, dt_ms);
    let before = rms(&grid, &window);

    let params = AmplifyParams {
        mode: ProcessingMode::Align {
            width_traces: 5,
            width_ms: 40.0,
        },
        transition: Transition::hard(TransitionMode::Inside),
    };
    let result = amplify_window(&grid, dt_ms, &points, &params).unwrap();
    let after = rms(&result.output, &window);

    assert!(after < before / 2.0, "before {before}, after {after}");
    assert_eq!(result.window, window);
}

#[test]
fn polygon_with_transition_stays_bounded() {
    let shape = Shape::new(50, 120);
    let grid = section(shape);
    let points = [
        Point::new(10, 40.0),
        Point::new(30, 20.0),
        Point::new(40, 150.0),
        Point::new(15, 200.0),
    ];
    for mode in TransitionMode::ALL {
        let params = AmplifyParams {
            mode: ProcessingMode::Scale { factor: 3.0 },
            transition: Transition {
                width_traces: 4,
                width_ms: 16.0,
                mode,
            },
        };
        let r = amplify_window(&grid, 2.0, &points, &params).unwrap();
        assert!(r
            .multiplier
            .as_slice()
            .iter()
            .all(|&m| (1.0..=3.0).contains(&m)));
        assert_eq!(r.output.shape(), shape);
        let touched = r.multiplier.as_slice().iter().filter(|&&m| m > 1.0).count();
        match mode {
            TransitionMode::Outside => assert!(touched > r.window.count()),
            TransitionMode::Inside => assert!(touched <= r.window.count()),
        }
    }
}
