use blm_analysis::{
    met_formulas::potential_temperature, PlotStyle, ProfileAnalysis, SpectralAnalysis,
    SpectralConstants, SurfaceAnalysis, TurbulenceAnalysis, TurbulenceSettings, WindComponent,
};
use metfor::{Celsius, HectoPascal, Quantity};
use strum::IntoEnumIterator;

mod utils;

use utils::approx_equal;

#[test]
fn test_surface_analysis() {
    let anal = SurfaceAnalysis::analyze(utils::load_surface(), utils::date(8, 0), utils::date(13, 0))
        .unwrap();

    // Both ends of the window are included
    assert_eq!(anal.window().len(), 5 * 24 + 1);
    assert_eq!(anal.window().times()[0], utils::date(8, 0));
    assert_eq!(*anal.window().times().last().unwrap(), utils::date(13, 0));

    // One record has a zero heat flux
    assert_eq!(anal.non_finite_count(), 1);

    let diurnal = anal.diurnal();
    assert_eq!(diurnal.len(), 24);
    assert_eq!(diurnal[0].count, 6);
    assert_eq!(diurnal[1].count, 5);
    assert!(diurnal[2].mean.is_infinite());

    // Stable at night, unstable at midday
    assert!(diurnal[0].mean > 0.0);
    assert!(diurnal[12].mean < 0.0);
}

#[test]
fn test_profile_analysis() {
    let anal = ProfileAnalysis::from_dir(utils::test_path("profiles")).unwrap();

    let names: Vec<&str> = anal.snapshots().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["May09_00UTC", "May09_12UTC"]);

    let night = &anal.snapshots()[0];
    let day = &anal.snapshots()[1];
    assert_eq!(night.len(), 13);
    // The level with a missing temperature is dropped
    assert_eq!(day.len(), 12);

    let theta = potential_temperature(Celsius(10.01), HectoPascal(1013.01)).unpack();
    assert!(approx_equal(night.theta()[0], theta, 1.0e-9));
    assert!(approx_equal(night.theta_at(2.0).unwrap(), theta, 1.0e-9));
    assert!(night.theta_at(5000.0).is_none());

    for summary in anal.summaries() {
        assert!(summary.lapse_rate.unwrap() > 0.0);
        assert_eq!(summary.lowest.unwrap().0, 2.0);
        assert_eq!(summary.highest.unwrap().0, 1500.0);
    }

    for snap in anal.snapshots() {
        assert!(snap
            .specific_humidity()
            .iter()
            .all(|&q| q > 0.0 && q < 0.02));
    }
}

#[test]
fn test_turbulence_analysis() {
    let settings = TurbulenceSettings::default();
    let anal = TurbulenceAnalysis::analyze(&utils::load_sonic(), &settings).unwrap();

    let blocks = anal.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].start, utils::date(9, 5));

    for block in blocks {
        // w and T fluctuate together, u against w
        assert!(block.heat_flux.unwrap() > 0.0);
        assert!(block.uw.unwrap() < 0.0);
        assert!(block.obukhov_length.unwrap().unpack() < 0.0);

        let u_star = block.friction_velocity.unwrap().unpack();
        assert!(u_star > 0.05 && u_star < 0.3, "u* = {}", u_star);

        assert!(block.tke.unwrap() > 0.0);
        assert!(approx_equal(
            block.mean_temperature.unwrap().unpack(),
            285.0,
            1.0
        ));
    }

    for comp in WindComponent::iter() {
        let hist = anal.histogram(comp).unwrap();
        assert_eq!(hist.counts().len(), 50);
        assert_eq!(hist.counts().iter().sum::<usize>(), 720);
    }
}

#[test]
fn test_spectral_analysis() {
    let data = utils::load_spectra();
    let anal = SpectralAnalysis::analyze(&data, &SpectralConstants::default()).unwrap();

    assert_eq!(anal.frequency.len(), 50);
    assert!(!anal.inertial_frequency.is_empty());
    assert!(anal.normalized_frequency.iter().all(|&n| n > 0.0));

    let variance = |c| anal.component(c).variance;
    assert!(variance(WindComponent::U) > variance(WindComponent::V));
    assert!(variance(WindComponent::V) > variance(WindComponent::W));

    // The fixture follows the empirical forms, which are isotropic at high frequency
    assert!(approx_equal(anal.isotropy_fraction_v.unwrap(), 1.0, 1.0e-12));
    assert!(approx_equal(anal.isotropy_fraction_w.unwrap(), 1.0, 1.0e-12));

    assert!(anal.mean_dissipation.iter().all(|&e| e > 0.0));
    assert!(anal.overall_dissipation().unwrap() > 0.0);
    assert!(anal.band_dissipation.unwrap() > 0.0);
}

#[test]
fn test_render_all_charts() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path();
    let style = PlotStyle::default();

    let mut written = vec![];

    let surface =
        SurfaceAnalysis::analyze(utils::load_surface(), utils::date(8, 0), utils::date(13, 0))
            .unwrap();
    written.extend(surface.render_charts(out, &style).unwrap());

    let profiles = ProfileAnalysis::from_dir(utils::test_path("profiles")).unwrap();
    written.extend(profiles.render_charts(out, &style).unwrap());

    let turbulence =
        TurbulenceAnalysis::analyze(&utils::load_sonic(), &TurbulenceSettings::default()).unwrap();
    written.extend(turbulence.render_charts(out, &style).unwrap());

    let spectra =
        SpectralAnalysis::analyze(&utils::load_spectra(), &SpectralConstants::default()).unwrap();
    written.extend(spectra.render_charts(out, &style).unwrap());

    assert_eq!(written.len(), 3 + 2 + 4 + 6);
    for path in &written {
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("<svg"), "{} is not an SVG", path.display());
    }
}
