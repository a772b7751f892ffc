use popdash::charts::StaticChartRenderer;
use popdash::config::DashboardConfig;
use popdash::data::{
    ContinentLookup, DataLoader, DataProcessor, DataSources, Dataset, LoaderError,
    NormalizedRecord, RawRow, Year, UNKNOWN_CONTINENT,
};
use popdash::state::{DashboardState, Event};
use popdash::stats::PopulationAggregator;
use proptest::prelude::*;
use std::fs;
use std::path::Path;

fn row(country: &str, year: &str, population: &str, density: &str, growth: &str) -> RawRow {
    RawRow {
        country: country.to_string(),
        year: year.to_string(),
        population: population.to_string(),
        density: density.to_string(),
        growth_rate: growth.to_string(),
    }
}

fn lookup() -> ContinentLookup {
    [("Brazil", "Americas"), ("France", "Europe")]
        .into_iter()
        .collect()
}

fn loaded(rows: &[RawRow]) -> (DashboardConfig, DashboardState) {
    let config = DashboardConfig::default();
    let state = DashboardState::new(&config, 1200.0)
        .apply(Event::LoadComplete(Ok(Dataset::from_rows(rows, &lookup()))));
    (config, state)
}

#[test]
fn brazil_and_france_sum_for_2021() {
    let rows = [
        row("Brazil", "2021", "10000", "25", "0.5"),
        row("France", "2021", "20000", "118", "0.2"),
    ];
    let records = DataProcessor::normalize_rows(&rows, &lookup());

    assert_eq!(
        PopulationAggregator::total_population(&records, &Year::from(2021)),
        30_000.0
    );
    let series = PopulationAggregator::population_series(&records);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].year, Year::from(2021));
    assert_eq!(series[0].population, 30_000.0);
}

#[test]
fn unknown_country_is_kept_and_summed() {
    let rows = [
        row("Brazil", "2021", "10000", "25", "0.5"),
        row("Atlantis", "2021", "5000", "3", "1.1"),
    ];
    let dataset = Dataset::from_rows(&rows, &lookup());
    let subset = dataset.filter_by_year(&Year::from("2021"));

    assert_eq!(subset.len(), 2);
    let atlantis = subset.iter().find(|r| r.country == "Atlantis").unwrap();
    assert_eq!(atlantis.continent, UNKNOWN_CONTINENT);
    assert_eq!(
        PopulationAggregator::sum_population(subset.iter().copied()),
        15_000.0
    );
}

#[test]
fn formatted_population_normalizes() {
    assert_eq!(DataProcessor::parse_population(" 1,234,567 "), Some(1_234_567.0));
    assert_eq!(DataProcessor::parse_population("n/a"), None);
}

#[test]
fn convert_population_picks_unit() {
    assert_eq!(
        PopulationAggregator::convert_population(1_500_000_000.0),
        "1.50 bn"
    );
    assert_eq!(PopulationAggregator::convert_population(2_500_000.0), "2.50 mn");
}

#[test]
fn year_change_replaces_point_set() {
    let rows = [
        row("Brazil", "2021", "10000", "25", "0.5"),
        row("France", "2021", "20000", "118", "0.2"),
        row("France", "1990", "15000", "104", "0.5"),
    ];
    let (config, state) = loaded(&rows);

    let view_2021 = state
        .apply(Event::YearChanged(Year::from(2021)))
        .view(&config);
    let view_1990 = state
        .apply(Event::YearChanged(Year::from(1990)))
        .view(&config);

    let countries = |view: &popdash::state::DashboardView| {
        view.scatter
            .points
            .iter()
            .map(|p| p.country.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(countries(&view_2021), vec!["Brazil", "France"]);
    assert_eq!(countries(&view_1990), vec!["France"]);
    assert_eq!(view_1990.world_population, 15_000.0);
}

#[test]
fn malformed_rows_render_empty_without_panicking() {
    let rows = [
        row("Brazil", "2021", "n/a", "abc", ""),
        row("France", "2021", "", "-", "x"),
    ];
    let (config, state) = loaded(&rows);
    let view = state.view(&config);

    assert_eq!(view.selected_year, Some(Year::from(2021)));
    assert!(view.scatter.points.is_empty());
    assert_eq!(view.world_population, 0.0);

    let svg = StaticChartRenderer::render_scatter_svg(&view).unwrap();
    assert_eq!(svg.matches("<circle").count(), view.legend.len());
}

#[test]
fn load_failure_leaves_empty_view() {
    let config = DashboardConfig::default();
    let loader = DataLoader::new(DataSources {
        csv_path: "/no/such/population.csv".into(),
        continents_path: "/no/such/CountryContinent.json".into(),
    });
    let state =
        DashboardState::new(&config, 1200.0).apply(Event::LoadComplete(loader.load_dataset()));

    assert!(state.dataset().is_none());
    let view = state.view(&config);
    assert!(view.years.is_empty());
    assert!(view.scatter.points.is_empty());
    assert!(view.error.is_some());
}

fn write_sources(dir: &Path, csv: &str) -> DataSources {
    let csv_path = dir.join("population.csv");
    let continents_path = dir.join("CountryContinent.json");
    fs::write(&csv_path, csv).unwrap();
    fs::write(
        &continents_path,
        r#"{"Brazil": "Americas", "France": "Europe"}"#,
    )
    .unwrap();
    DataSources {
        csv_path,
        continents_path,
    }
}

#[test]
fn loads_padded_headers_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(
        dir.path(),
        "Year, Country , Population_Density ,Population_Growth_Rate,Population (000s)\n\
         2021,Brazil,25.3,0.52,\"214,326\"\n\
         2021,France,118.9,0.2,\"64,531\"\n\
         1990,France,104.1,0.5,\"56,412\"\n",
    );

    let dataset = DataLoader::new(sources).load_dataset().unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.years(), &[Year::from(1990), Year::from(2021)]);

    let brazil = &dataset.records()[0];
    assert_eq!(brazil.country, "Brazil");
    assert_eq!(brazil.continent, "Americas");
    assert_eq!(brazil.population, Some(214_326.0));
    assert_eq!(brazil.population_text, "214,326");
    assert_eq!(brazil.density, Some(25.3));
    assert_eq!(
        PopulationAggregator::total_population(dataset.records(), &Year::from(2021)),
        278_857.0
    );
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(
        dir.path(),
        "Year,Country,Population_Density,Population (000s)\n2021,Brazil,25.3,214326\n",
    );

    let err = DataLoader::new(sources).load_dataset().unwrap_err();
    match err {
        LoaderError::MissingColumn(column) => assert_eq!(column, "Population_Growth_Rate"),
        other => panic!("expected missing column, got {other}"),
    }
}

fn record_strategy() -> impl Strategy<Value = Vec<NormalizedRecord>> {
    prop::collection::vec(
        (1990i64..1996, 0u32..1_000_000, "[A-Z][a-z]{2,8}"),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(year, population, country)| NormalizedRecord {
                country,
                year: Year::from(year),
                density: Some(1.0),
                growth_rate: Some(1.0),
                population: Some(population as f64),
                population_text: population.to_string(),
                continent: UNKNOWN_CONTINENT.to_string(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn year_total_ignores_record_order(
        (records, shuffled) in record_strategy()
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
    ) {
        for year in DataProcessor::distinct_years(&records) {
            prop_assert_eq!(
                PopulationAggregator::total_population(&records, &year),
                PopulationAggregator::total_population(&shuffled, &year)
            );
        }
        prop_assert_eq!(
            PopulationAggregator::population_series(&records),
            PopulationAggregator::population_series(&shuffled)
        );
    }

    #[test]
    fn yearly_filters_partition_the_dataset(records in record_strategy()) {
        let dataset = Dataset::from_records(records);
        let mut seen = 0;
        for year in dataset.years() {
            let subset = dataset.filter_by_year(year);
            prop_assert!(!subset.is_empty());
            prop_assert!(subset.iter().all(|r| &r.year == year));
            seen += subset.len();
        }
        prop_assert_eq!(seen, dataset.len());
    }
}
