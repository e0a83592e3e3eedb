#[macro_use]
mod utils;

check_table!(
    surface_record_complete,
    "surface_record.txt",
    192,
    [
        "year", "month", "day", "hour", "Press", "Rain", "Ta002", "U010", "ust005", "wT005",
        "NRad", "H", "LE", "G"
    ]
);
check_table!(
    sonic_series_complete,
    "sonic_series.txt",
    720,
    ["yyyy", "mm", "dd", "HH", "MIN", "SEC", "u", "v", "w", "T"]
);
check_table!(spectra_complete, "spectra.txt", 50, ["freq", "Su", "Sv", "Sw"]);
check_table!(
    profile_complete,
    "profiles/May09_00UTC.txt",
    13,
    ["index", "T", "Td", "press"]
);

#[test]
fn test_load_time_series() {
    let surface = utils::load_surface();
    assert_eq!(surface.len(), 192);
    assert_eq!(surface.times()[0], utils::date(7, 0));
    assert!(!surface.table().has_column("year"));

    let sonic = utils::load_sonic();
    assert_eq!(sonic.len(), 720);
    assert_eq!(sonic.times()[0], utils::date(9, 5));
    assert!(sonic.times().windows(2).all(|w| w[0] < w[1]));
}
