//! Upload → select → render → export flows driven through the session handler.

use csv_insight::charts::correlation::correlation_matrix;
use csv_insight::charts::histogram::{Histogram, BIN_COUNT};
use csv_insight::charts::{ColumnSelection, PlotKind, RenderOptions};
use csv_insight::data::TableLoader;
use csv_insight::stats::StatResult;
use csv_insight::web::session::PlotOutput;
use csv_insight::web::{Action, Outcome, Session};

fn session(csv: &str) -> Session {
    let mut session = Session::new(RenderOptions {
        width: 480,
        height: 320,
    });
    let outcome = session.handle(Action::Upload(csv.as_bytes().to_vec())).unwrap();
    assert!(matches!(outcome, Outcome::TableLoaded(_)));
    session
}

fn plot(session: &mut Session, selection: ColumnSelection) -> PlotOutput {
    match session.handle(Action::SubmitPlot(selection)).unwrap() {
        Outcome::Plot(plot) => plot,
        other => panic!("expected a plot, got {other:?}"),
    }
}

#[test]
fn scatter_plot_download_link() {
    let mut session = session("x,y\n1,2\n2,4\n3,6\n");
    let plot = plot(&mut session, ColumnSelection::pair(PlotKind::Scatter, "x", "y"));

    assert_eq!(plot.title, "Scatter Plot of x vs y");
    assert_eq!(plot.x_label, "x");
    assert_eq!(plot.y_label, "y");
    assert!(plot.href.starts_with("data:file/png;base64,"));
    assert!(plot.html.ends_with(r#"download="scatter_plot.png">Download PNG</a>"#));
}

#[test]
fn histogram_of_small_column() {
    let csv = "v\n1\n1\n2\n2\n2\n3\n";
    let mut session = session(csv);
    let plot = plot(&mut session, ColumnSelection::histogram("v"));
    assert_eq!(plot.title, "Histogram of v");
    assert_eq!(plot.y_label, "Frequency");
    assert_eq!(plot.filename, "histogram.png");

    let table = TableLoader::load_bytes(csv.as_bytes().to_vec()).unwrap();
    let histogram = Histogram::from_values(&table.numeric_values_dropna("v").unwrap());
    assert_eq!(histogram.counts.len(), BIN_COUNT);
    assert_eq!(histogram.min(), 1.0);
    assert_eq!(histogram.max(), 3.0);
    assert_eq!(histogram.counts.iter().sum::<usize>(), 6);
    assert_eq!(histogram.counts[0], 2);
    assert_eq!(histogram.counts[BIN_COUNT - 1], 1);
}

#[test]
fn heatmap_of_linear_columns_is_all_ones() {
    let csv = "a,b\n1,2\n2,4\n3,6\n";
    let mut session = session(csv);
    let plot = plot(&mut session, ColumnSelection::pair(PlotKind::Heatmap, "a", "b"));
    assert_eq!(plot.title, "Correlation Heatmap of a vs b");
    assert_eq!(plot.filename, "heatmap.png");

    let table = TableLoader::load_bytes(csv.as_bytes().to_vec()).unwrap();
    let matrix = correlation_matrix(
        &table.numeric_values("a").unwrap(),
        &table.numeric_values("b").unwrap(),
    );
    for row in matrix {
        for value in row {
            assert!((value - 1.0).abs() < 1e-12, "{value}");
        }
    }
}

#[test]
fn ttest_needs_two_numeric_columns() {
    let mut session = session("v,name\n1,a\n2,b\n3,c\n");
    let outcome = session
        .handle(Action::SubmitTTest {
            column1: "v".into(),
            column2: "v".into(),
            equal_var: true,
        })
        .unwrap();
    match outcome {
        Outcome::Message { message } => {
            assert_eq!(message, "Not enough numeric columns to perform a T-test.")
        }
        other => panic!("expected message, got {other:?}"),
    }

    let outcome = session.handle(Action::PlotOptions(PlotKind::Heatmap)).unwrap();
    assert!(matches!(
        outcome,
        Outcome::Message { message }
            if message == "Not enough numeric columns to generate a correlation heatmap."
    ));
}

#[test]
fn ttest_is_symmetric() {
    let mut session = session("a,b\n1,2\n2,3\n3,5\n4,4\n5,8\n");
    let mut run = |c1: &str, c2: &str| match session
        .handle(Action::SubmitTTest {
            column1: c1.into(),
            column2: c2.into(),
            equal_var: true,
        })
        .unwrap()
    {
        Outcome::Stats {
            result: StatResult::TTest(result),
        } => result,
        other => panic!("expected t-test, got {other:?}"),
    };

    let ab = run("a", "b");
    let ba = run("b", "a");
    assert!((ab.statistic + ba.statistic).abs() < 1e-12);
    assert!((ab.p_value - ba.p_value).abs() < 1e-12);
    assert!(ab.statistic < 0.0);
}

#[test]
fn summary_covers_numeric_columns_only() {
    let mut session = session("a,name,b\n1,x,10\n2,y,\n3,z,30\n");
    let Outcome::Stats {
        result: StatResult::Summary { columns },
    } = session.handle(Action::ShowSummary).unwrap()
    else {
        panic!("expected summary");
    };
    let names: Vec<_> = columns.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(columns[1].count, 2);
}

#[test]
fn new_upload_replaces_table() {
    let mut session = session("a,b\n1,2\n");
    let outcome = session.handle(Action::Upload(b"only\n5\n6\n".to_vec())).unwrap();
    let Outcome::TableLoaded(overview) = outcome else {
        panic!("expected overview");
    };
    assert_eq!(overview.row_count, 2);
    assert_eq!(overview.numeric_columns, ["only"]);
    assert_eq!(session.table().unwrap().column_names(), ["only"]);
}

#[test]
fn infinite_values_are_skipped_when_plotting() {
    let mut session = session("v,w\n1,2\n2,3\ninf,4\n");
    assert_eq!(
        session.table().unwrap().numeric_values("v").unwrap(),
        vec![Some(1.0), Some(2.0), None]
    );

    let histogram = plot(&mut session, ColumnSelection::histogram("v"));
    assert_eq!(histogram.filename, "histogram.png");
    let scatter = plot(&mut session, ColumnSelection::pair(PlotKind::Scatter, "v", "w"));
    assert_eq!(scatter.filename, "scatter_plot.png");
}
