use api::*;
use core::config::*;
use core::error::*;
use core::film::*;
use core::geometry::*;
use core::interaction::*;
use core::parallel::*;
use core::pbrt::*;
use core::rng::RNG;
use core::scene::*;
use core::spectrum::*;
use float_cmp::approx_eq;
use integrators::*;
use shapes::*;
use std::sync::Arc;

const SEED: u64 = 0x5eed;

fn scene(name: &str) -> Scene {
    canned_scene(name, 1.0).unwrap()
}

/// Samples an eye and a light subpath for each of `n` iterations and calls
/// `f` with every strategy that lies within the length bound.
fn for_each_strategy<F>(scene: &Scene, max_vertices: usize, n: usize, mut f: F)
where
    F: FnMut(&Subpath, &Subpath, usize, usize),
{
    let mut rng = RNG::new(SEED);
    let mut eye = Subpath::new(TransDir::EL);
    let mut light = Subpath::new(TransDir::LE);
    for _ in 0..n {
        eye.sample(&mut rng, scene, max_vertices);
        light.sample(&mut rng, scene, max_vertices);
        for s in 0..=light.len() {
            for t in 0..=eye.len() {
                if s + t >= 2 && s + t <= max_vertices {
                    f(&eye, &light, s, t);
                }
            }
        }
    }
}

fn config(technique: Technique, max_path_length: usize) -> RenderConfig {
    RenderConfig {
        min_path_length: 2,
        max_path_length,
        seed: Some(SEED),
        threads: 2,
        technique,
        quiet: true,
    }
}

fn render_total(scene: &Scene, technique: Technique, max_path_length: usize, size: usize, spp: u64) -> Spectrum {
    let film = BitmapFilm::new(size, size).unwrap();
    let scheduler = SppScheduler::new(size, size, spp).unwrap();
    let stats = render(scene, &film, &scheduler, &config(technique, max_path_length)).unwrap();
    assert_eq!(stats.processed, (size * size) as u64 * spp);

    let pixels = film.pixels();
    for p in pixels.iter() {
        assert!(p.is_valid_radiance(), "{:?}", p);
    }
    pixels.iter().fold(Spectrum::ZERO, |acc, p| acc + *p)
}

fn assert_close(a: Float, b: Float, rel: Float) {
    let scale = a.abs().max(b.abs()).max(1e-6);
    assert!((a - b).abs() <= rel * scale, "{a} vs {b}");
}

#[test]
fn subpath_length_is_bounded() {
    for name in ["cornell", "point", "sun", "mirror"] {
        let scene = scene(name);
        let mut rng = RNG::new(SEED);
        for max_vertices in 0..6 {
            for _ in 0..200 {
                for trans_dir in [TransDir::EL, TransDir::LE] {
                    let subpath = sample_subpath(&mut rng, &scene, max_vertices, trans_dir);
                    assert!(subpath.len() <= max_vertices, "{name}");
                    assert_eq!(subpath.is_empty(), max_vertices == 0, "{name}");
                }
            }
        }
    }
}

#[test]
fn subpath_reads_in_both_directions() {
    let scene = scene("cornell");
    let mut rng = RNG::new(SEED);
    let light = sample_subpath(&mut rng, &scene, 5, TransDir::LE);
    let n = light.len();
    assert!(n >= 1);

    let first = light.vertex_at(0, TransDir::LE).unwrap();
    assert_eq!(first.sp().kind, InteractionKind::LightEndpoint);
    assert_eq!(light.vertex_at(n - 1, TransDir::EL).unwrap().sp(), first.sp());
    assert!(light.vertex_at(n, TransDir::LE).is_none());
    assert!(first.pdf_fwd() > 0.0);

    // Every vertex with a successor that scattered knows its reverse density.
    for i in 0..n.saturating_sub(2) {
        assert!(light.vertex_at(i, TransDir::LE).unwrap().pdf_rev().is_some());
    }
}

#[test]
fn degenerate_endpoints_never_splat() {
    for name in ["cornell", "point"] {
        let scene = scene(name);
        for_each_strategy(&scene, 6, 300, |eye, light, s, t| {
            if t == 0 {
                // The pinhole is a degenerate point.
                assert!(connect(&scene, eye, light, s, t).is_none());
            }
            if s == 0 && name == "point" {
                assert!(connect(&scene, eye, light, s, t).is_none());
            }
        });
    }
}

#[test]
fn specular_vertices_never_connect() {
    let scene = scene("mirror");
    let mut specular_connections = 0;
    for_each_strategy(&scene, 6, 500, |eye, light, s, t| {
        if s == 0 || t == 0 {
            return;
        }
        let v_l = light.vertex_at(s - 1, TransDir::LE).unwrap();
        let v_e = eye.vertex_at(t - 1, TransDir::EL).unwrap();
        if scene.is_specular_component(v_l.sp()) || scene.is_specular_component(v_e.sp()) {
            specular_connections += 1;
            assert!(connect(&scene, eye, light, s, t).is_none());
        }
    });
    assert!(specular_connections > 0);
}

#[test]
fn blocker_occludes_connections() {
    // Floor points under the blocker never see the light.
    let under_blocker = |p: Point3f| p.y.abs() < 1e-3 && p.x.abs() < 2.0 && p.z.abs() < 2.0;

    let blocked = scene("blocker");
    let mut tested = 0;
    for_each_strategy(&blocked, 4, 500, |eye, light, s, t| {
        if s != 1 || t == 0 {
            return;
        }
        let v_e = eye.vertex_at(t - 1, TransDir::EL).unwrap();
        if under_blocker(v_e.geom().p()) {
            tested += 1;
            assert!(connect(&blocked, eye, light, s, t).is_none());
        }
    });
    assert!(tested > 0);

    let open = scene("floor");
    let mut connected = 0;
    for_each_strategy(&open, 4, 500, |eye, light, s, t| {
        if s == 1 && t >= 2 && connect(&open, eye, light, s, t).is_some() {
            connected += 1;
        }
    });
    assert!(connected > 0);
}

#[test]
fn contributions_are_finite_and_non_negative() {
    for name in SCENE_NAMES {
        let scene = scene(name);
        for_each_strategy(&scene, 6, 200, |eye, light, s, t| {
            if let Some(splat) = connect(&scene, eye, light, s, t) {
                assert!(splat.c.is_valid_radiance(), "{name} ({s}, {t}): {:?}", splat.c);
                assert!(!splat.c.is_black());
                assert!(splat.rp.in_unit_square(), "{name} ({s}, {t})");
                let w = mis_weight(&scene, eye, light, s, t);
                assert!(w > 0.0 && w <= 1.0, "{name} ({s}, {t}): {w}");
            }
        });
    }
}

#[test]
fn contribution_is_measurement_over_density() {
    for name in ["cornell", "point", "sun", "mixture"] {
        let scene = scene(name);
        for_each_strategy(&scene, 5, 200, |eye, light, s, t| {
            let Some(splat) = connect(&scene, eye, light, s, t) else {
                return;
            };
            let path = FullPath::from_subpaths(eye, light, s, t).unwrap();
            let f = path.measurement_contribution(&scene, s);
            let p = path.pdf(&scene, s);
            assert!(p > 0.0, "{name} ({s}, {t})");
            for c in 0..3 {
                assert_close(splat.c[c], f[c] / p, 1e-2);
            }
        });
    }
}

#[test]
fn weights_match_full_path_evaluation() {
    for name in ["cornell", "mirror", "point", "sun", "mixture"] {
        let scene = scene(name);
        let mut compared = 0;
        for_each_strategy(&scene, 6, 200, |eye, light, s, t| {
            if connect(&scene, eye, light, s, t).is_none() {
                return;
            }
            let w = mis_weight(&scene, eye, light, s, t);
            let path = FullPath::from_subpaths(eye, light, s, t).unwrap();
            let w_naive = path.mis_weight(&scene, s);
            assert!(
                approx_eq!(Float, w, w_naive, epsilon = 1e-3),
                "{name} ({s}, {t}): {w} vs {w_naive}"
            );
            compared += 1;
        });
        assert!(compared > 0, "{name}");
    }
}

#[test]
fn weights_form_partition_of_unity() {
    for name in ["cornell", "mirror", "point"] {
        let scene = scene(name);
        for_each_strategy(&scene, 6, 100, |eye, light, s, t| {
            if connect(&scene, eye, light, s, t).is_none() {
                return;
            }
            let path = FullPath::from_subpaths(eye, light, s, t).unwrap();
            let n = path.len();
            assert!(path.is_samplable(&scene, s));
            let sum: Float = (0..=n)
                .filter(|&s2| path.is_samplable(&scene, s2))
                .map(|s2| path.mis_weight(&scene, s2))
                .sum();
            assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-4), "{name} ({s}, {t}): {sum}");
        });
    }
}

#[test]
fn renders_are_deterministic() {
    let scene = scene("cornell");
    let render_once = || {
        let film = BitmapFilm::new(16, 16).unwrap();
        let scheduler = SampleScheduler::new(4096).unwrap();
        let stats = render(&scene, &film, &scheduler, &config(Technique::Bdpt, 5)).unwrap();
        assert_eq!(stats.seed, SEED);
        film.pixels()
    };
    assert_eq!(render_once(), render_once());
}

#[test]
fn bidirectional_matches_path_tracing() {
    let scene = scene("floor");
    let bdpt = render_total(&scene, Technique::Bdpt, 3, 32, 16);
    let pt = render_total(&scene, Technique::PtNee, 3, 32, 16);
    let naive = render_total(&scene, Technique::BdptNaive, 3, 32, 16);
    assert!(bdpt[0] > 0.0);
    for c in 0..3 {
        assert_close(bdpt[c], pt[c], 0.05);
        assert_close(bdpt[c], naive[c], 0.01);
    }
}

#[test]
fn light_tracing_matches_path_tracing() {
    let scene = scene("floor");
    let lt = render_total(&scene, Technique::LtNee, 3, 32, 16);
    let pt = render_total(&scene, Technique::PtNee, 3, 32, 16);
    assert_close(lt[0], pt[0], 0.08);
}

#[test]
fn strategy_films_separate_contributions() {
    let scene = scene("floor");
    let (width, height) = (32, 32);
    let film = BitmapFilm::new(width, height).unwrap();
    let strategy_films = StrategyFilms::new(width, height, 3).unwrap();
    let scheduler = SppScheduler::new(width, height, 16).unwrap();
    let renderer = BDPTRenderer::new(config(Technique::Bdpt, 3)).unwrap();
    renderer
        .render(&scene, &film, &scheduler, Some(&strategy_films))
        .unwrap();

    let total = |k: usize, s: usize| {
        strategy_films
            .get(k, s)
            .unwrap()
            .pixels()
            .iter()
            .fold(0.0, |acc, p| acc + p[0])
    };

    // The pinhole cannot be hit by a light subpath.
    assert_eq!(total(2, 2), 0.0);
    assert_eq!(total(3, 3), 0.0);

    // Next event estimation and light tracing estimate the same direct
    // illumination.
    assert!(total(3, 1) > 0.0);
    assert_close(total(3, 1), total(3, 2), 0.1);
}

#[test]
fn unrenderable_scene_is_rejected() {
    let mut builder = SceneBuilder::new();
    builder
        .shape(Arc::new(Quad::new(
            Point3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(2.0, 0.0, 0.0),
        )))
        .look_at(
            Point3f::new(0.0, 1.0, 3.0),
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            1.0,
        );
    let scene = builder.world_end();
    let film = BitmapFilm::new(4, 4).unwrap();
    let scheduler = SampleScheduler::new(16).unwrap();
    let result = render(&scene, &film, &scheduler, &config(Technique::Bdpt, 4));
    assert!(matches!(result, Err(RenderError::NoLights)));
}

#[test]
fn invalid_path_lengths_are_rejected() {
    let scene = scene("floor");
    let film = BitmapFilm::new(4, 4).unwrap();
    let scheduler = SampleScheduler::new(16).unwrap();
    let config = RenderConfig {
        min_path_length: 3,
        max_path_length: 2,
        ..config(Technique::Bdpt, 2)
    };
    assert!(matches!(
        render(&scene, &film, &scheduler, &config),
        Err(RenderError::InvalidPathLength { min: 3, max: 2 })
    ));
}
