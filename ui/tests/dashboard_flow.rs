//! End-to-end flows: CSV text → store → aggregation → chart → export.

use futures::executor::block_on;

use ui::charts::line::LineRenderOptions;
use ui::charts::zoom::{visible_range, DeltaMode};
use ui::charts::{Frame, LineChart};
use ui::core::config::DatasetConfig;
use ui::core::format::ValueFormat;
use ui::data::aggregate::{series_rows, time_series, total};
use ui::data::row::number;
use ui::data::{columns, DashboardStore, DataSource, FilterKey};
use ui::export::csv::{to_csv_string, BOM};
use ui::export::png::{rasterize, PngHeader};
use ui::export::DownloadPayload;

fn load(csv: &str) -> DashboardStore {
    let source = DataSource::Inline(vec![("modes.csv".into(), csv.into())]);
    let specs = vec![DatasetConfig {
        id: "modes".into(),
        file: "modes.csv".into(),
        label: "Modes".into(),
    }];
    let mut store = DashboardStore::new();
    block_on(store.load_data(&source, &specs));
    assert!(store.is_ready());
    store
}

fn three_years() -> DashboardStore {
    load("Year,Trade Type,Mode,Trade Value\n2022,Export,Truck,10\n2023,Import,Rail,20\n2024,Export,Truck,30\n")
}

fn decade() -> DashboardStore {
    let mut csv = String::from("Year,Trade Type,Mode,Value\n");
    for (i, year) in (2015..=2024).enumerate() {
        csv.push_str(&format!("{year},Export,Truck,{}\n", 100 + i * 10));
        csv.push_str(&format!("{year},Import,Rail,{}\n", 50 + i * 5));
    }
    load(&csv)
}

fn payload_for(store: &DashboardStore) -> (Vec<ui::data::aggregate::SeriesPoint>, DownloadPayload) {
    let rows = store.filtered_rows("modes").unwrap();
    let points = time_series(&rows, columns::YEAR, columns::VALUE, None);
    let payload = DownloadPayload::new("trade-over-time")
        .summary(series_rows(&points, "Year", None, "Value"))
        .detail(rows);
    (points, payload)
}

#[test]
fn summary_export_matches_the_loaded_rows() {
    let store = three_years();
    let (points, payload) = payload_for(&store);
    assert_eq!(points.len(), 3);
    assert!(points.iter().all(|p| p.series == "Total"));

    let csv = to_csv_string(&payload.summary_rows).unwrap();
    assert!(csv.starts_with(BOM));
    let mut reader = csv::Reader::from_reader(csv.trim_start_matches(BOM).as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), ["Year", "Value"]);
    let sum: f64 = reader
        .records()
        .map(|record| record.unwrap()[1].parse::<f64>().unwrap())
        .sum();
    assert_eq!(sum, 60.0);
}

#[test]
fn filters_narrow_the_detail_export() {
    let mut store = three_years();
    store.set_filter(FilterKey::TradeType, "Export");
    let (_, payload) = payload_for(&store);
    assert_eq!(payload.detail_rows.len(), 2);
    assert_eq!(total(&payload.detail_rows, columns::VALUE), 40.0);

    store.reset_filters();
    let (_, payload) = payload_for(&store);
    assert_eq!(payload.detail_rows.len(), 3);
}

#[test]
fn zoomed_exports_stay_inside_the_visible_range() {
    let store = decade();
    let (points, baseline) = payload_for(&store);
    let chart = LineChart::new(&points, Frame::new(900.0, 320.0), ValueFormat::Currency);
    let mut zoom = chart.zoom_behavior();
    let centre = (chart.area.left + chart.area.right) / 2.0;

    assert!(zoom.wheel(centre, -500.0, DeltaMode::Pixel));
    let range = visible_range(columns::YEAR, &chart.x, &zoom.transform).unwrap();
    assert!(range.min > 2015.0 && range.max < 2024.0);

    let scoped = baseline.scoped(Some(&range));
    assert!(!scoped.summary_rows.is_empty());
    assert!(scoped.summary_rows.len() <= baseline.summary_rows.len());
    assert!(scoped.detail_rows.len() < baseline.detail_rows.len());
    // the summary uses "Year", the detail rows the canonical "year"
    for row in &scoped.summary_rows {
        assert!(range.contains(number(row, "Year").unwrap()));
    }
    for row in &scoped.detail_rows {
        assert!(range.contains(number(row, columns::YEAR).unwrap()));
    }

    zoom.reset();
    let cleared = visible_range(columns::YEAR, &chart.x, &zoom.transform);
    assert!(cleared.is_none());
    assert_eq!(baseline.scoped(cleared.as_ref()), baseline);
}

#[test]
fn three_year_zoom_narrows_to_the_middle_year() {
    let store = three_years();
    let (points, baseline) = payload_for(&store);
    let chart = LineChart::new(&points, Frame::new(900.0, 320.0), ValueFormat::Currency);
    let mut zoom = chart.zoom_behavior();
    let centre = (chart.area.left + chart.area.right) / 2.0;

    assert!(zoom.wheel(centre, -500.0, DeltaMode::Pixel));
    assert_eq!(zoom.transform.k, 2.0);
    let range = visible_range(columns::YEAR, &chart.x, &zoom.transform).unwrap();
    assert_eq!((range.min, range.max), (2023.0, 2023.0));
    assert_eq!(baseline.scoped(Some(&range)).summary_rows.len(), 1);
}

#[test]
fn png_export_has_stable_dimensions() {
    let store = three_years();
    let (points, _) = payload_for(&store);
    let chart = LineChart::new(&points, Frame::new(400.0, 200.0), ValueFormat::Currency);
    let options = LineRenderOptions {
        clip_id: "clip-flow".into(),
        ..Default::default()
    };
    let doc = chart.render(&Default::default(), &options);
    let header = PngHeader::new("Trade over time", Some("All modes".into()));

    let first = block_on(rasterize(&doc, Some(&header))).unwrap();
    let second = block_on(rasterize(&doc, Some(&header))).unwrap();
    assert_eq!((first.width, first.height), (800, 528));
    assert_eq!((first.width, first.height), (second.width, second.height));
    assert_eq!(&first.bytes[..8], b"\x89PNG\r\n\x1a\n");
}
