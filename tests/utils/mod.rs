use std::path::PathBuf;

use blm_analysis::{
    spectra::SpectralData, surface::load_surface_record, turbulence::load_sonic_series, TimeSeries,
};

pub fn test_path(fname: &str) -> PathBuf {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    test_path
}

#[allow(dead_code)]
pub fn load_surface() -> TimeSeries {
    let path = test_path("surface_record.txt");
    load_surface_record(&path).expect(&format!("Error loading file: {:#?}", path))
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

#[allow(dead_code)]
pub fn date(day: u32, hour: u32) -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2008, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[allow(dead_code)]
pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    assert!(eps > 0.0);

    (val1 - val2).abs() < eps
}

#[allow(unused_macros)] // False alarm
macro_rules! check_table {
    ($test_name:ident, $fname:expr, $rows:expr, $columns:expr) => {
        #[test]
        fn $test_name() {
            let table = blm_analysis::Table::from_file(utils::test_path($fname)).unwrap();

            assert_eq!(table.len(), $rows);
            for col in $columns.iter() {
                assert!(table.has_column(col), "missing column {}", col);
            }
        }
    };
}
