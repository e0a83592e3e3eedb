use blm_analysis::{spectra::SpectralData, turbulence::load_sonic_series, TimeSeries};
use std::path::PathBuf;

fn test_path(fname: &str) -> PathBuf {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    test_path
}

#[allow(dead_code)]
pub fn load_sonic() -> TimeSeries {
    let path = test_path("sonic_series.txt");
    load_sonic_series(&path).expect(&format!("Error loading file: {:#?}", path))
}

#[allow(dead_code)]
pub fn load_spectra() -> SpectralData {
    let path = test_path("spectra.txt");
    SpectralData::from_file(&path).expect(&format!("Error loading file: {:#?}", path))
}
