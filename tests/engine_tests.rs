use std::cell::Cell;
use std::rc::Rc;

use chrono::{Datelike, Days, NaiveDate};
use stockchart::api::{ATR_PANE_ID, ChartConfig, ChartEngine, PRICE_PANE_ID, RSI_PANE_ID};
use stockchart::core::{Bar, Extent, TimeRangeFilter, Viewport};
use stockchart::interaction::{NullScrollBlocker, ScrollBlocker};
use stockchart::render::{NullRenderer, RenderFrame, RenderLayer, Renderer};
use stockchart::{ChartError, ChartResult};

fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut day = start;
    while dates.len() < count {
        if day.weekday().number_from_monday() <= 5 {
            dates.push(day);
        }
        day = day + Days::new(1);
    }
    dates
}

fn sample_bars(count: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).expect("monday");
    trading_days(start, count)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let base = 100.0 + (i % 17) as f64 - (i % 5) as f64 * 0.5;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            Bar::new(date, base, base + 2.0, base - 2.0, close, 1_000 + i as u64).expect("bar")
        })
        .collect()
}

fn engine() -> ChartEngine<NullRenderer, NullScrollBlocker> {
    ChartEngine::new(
        NullRenderer::default(),
        NullScrollBlocker::default(),
        ChartConfig::default(),
    )
    .expect("engine init")
}

#[derive(Debug, Default)]
struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _frame: &RenderFrame) -> ChartResult<()> {
        Err(ChartError::InvalidData("backend lost its surface".to_owned()))
    }
}

#[derive(Debug, Clone, Default)]
struct SharedBlocker {
    blocked: Rc<Cell<bool>>,
}

impl ScrollBlocker for SharedBlocker {
    fn block_page_scroll(&mut self) {
        self.blocked.set(true);
    }

    fn unblock_page_scroll(&mut self) {
        self.blocked.set(false);
    }
}

#[test]
fn engine_smoke_flow() {
    let mut engine = engine();
    engine.set_bars(sample_bars(200)).expect("set bars");

    assert_eq!(engine.bars().len(), 200);
    assert_eq!(engine.time_scale().extent(), Some(Extent { start: 50, end: 199 }));
    assert!(engine.layout().get(PRICE_PANE_ID).expect("price").y_domain.is_some());

    let hover = engine.pointer_move(400.0, 380.0).clone();
    assert_eq!(hover.active_pane, Some(RSI_PANE_ID));
    assert!(hover.index.is_some_and(|index| (50..=199).contains(&index)));
    assert!(engine.is_scroll_locked());
    assert!(engine.scroll_blocker().blocked);

    engine.render().expect("render");
    assert_eq!(engine.renderer().frames_rendered, 1);
    assert!(engine.renderer().last_text_count > 0);

    engine.pointer_leave();
    assert!(!engine.is_scroll_locked());
    assert!(engine.hover().is_none());
    assert_eq!(engine.scroll_blocker().block_calls, 1);
    assert_eq!(engine.scroll_blocker().unblock_calls, 1);
}

#[test]
fn empty_engine_renders_an_empty_frame() {
    let mut engine = engine();
    assert!(engine.frame().is_empty());
    engine.render().expect("render");
    assert_eq!(engine.renderer().last_command_count, 0);
}

#[test]
fn crosshair_spans_every_pane_and_tooltip_follows_active_pane() {
    let mut engine = engine();
    engine.set_bars(sample_bars(60)).expect("set bars");
    engine.pointer_move(400.0, 100.0);

    let frame = engine.frame();
    let crosshair_panes: Vec<_> = frame
        .layer_commands(RenderLayer::Crosshair)
        .map(|command| command.pane_id)
        .collect();
    for pane in [PRICE_PANE_ID, RSI_PANE_ID, ATR_PANE_ID] {
        assert!(crosshair_panes.contains(&pane));
    }

    let tooltip: Vec<&str> = frame
        .layer_commands(RenderLayer::Tooltip)
        .filter_map(|command| match &command.primitive {
            stockchart::render::Primitive::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect();
    assert!(tooltip[0].starts_with("Date: "));
    assert!(tooltip.iter().any(|line| line.starts_with("Volume: ")));
    assert!(tooltip.iter().any(|line| line.starts_with("EMA (26): ")));
    assert!(
        frame
            .layer_commands(RenderLayer::Tooltip)
            .all(|command| command.pane_id == PRICE_PANE_ID)
    );
}

#[test]
fn wheel_is_ignored_until_pointer_enters() {
    let mut engine = engine();
    engine.set_bars(sample_bars(200)).expect("set bars");

    assert_eq!(engine.wheel(0.0, -100.0).expect("wheel"), None);
    assert_eq!(engine.time_scale().extent(), Some(Extent { start: 50, end: 199 }));

    engine.pointer_move(400.0, 100.0);
    let zoomed = engine.wheel(0.0, -100.0).expect("wheel").expect("extent");
    assert_eq!(zoomed.len(), 125);
    assert_eq!(engine.time_scale().extent(), Some(zoomed));

    let panned = engine.wheel(-1.0, 0.0).expect("wheel").expect("extent");
    assert_eq!(panned.start + 1, zoomed.start);
}

#[test]
fn invalid_wheel_delta_releases_scroll_lock() {
    let mut engine = engine();
    engine.set_bars(sample_bars(50)).expect("set bars");
    engine.pointer_enter();
    assert!(engine.is_scroll_locked());

    assert!(engine.wheel(f64::NAN, 0.0).is_err());
    assert!(!engine.is_scroll_locked());
    assert!(!engine.scroll_blocker().blocked);
}

#[test]
fn render_failure_releases_scroll_lock() {
    let mut engine = ChartEngine::new(
        FailingRenderer,
        NullScrollBlocker::default(),
        ChartConfig::default(),
    )
    .expect("engine init");
    engine.set_bars(sample_bars(40)).expect("set bars");
    engine.pointer_move(300.0, 200.0);
    assert!(engine.scroll_blocker().blocked);

    assert!(engine.render().is_err());
    assert!(!engine.is_scroll_locked());
    assert!(!engine.scroll_blocker().blocked);
    assert_eq!(engine.scroll_blocker().unblock_calls, 1);
}

#[test]
fn dropping_engine_restores_page_scroll() {
    let blocker = SharedBlocker::default();
    let blocked = Rc::clone(&blocker.blocked);
    {
        let mut engine =
            ChartEngine::new(NullRenderer::default(), blocker, ChartConfig::default())
                .expect("engine init");
        engine.pointer_enter();
        assert!(blocked.get());
    }
    assert!(!blocked.get());
}

#[test]
fn rejected_dataset_keeps_previous_state() {
    let mut engine = engine();
    engine.set_bars(sample_bars(30)).expect("set bars");
    engine.pointer_enter();

    let mut unsorted = sample_bars(30);
    unsorted.swap(3, 4);
    let err = engine.set_bars(unsorted).expect_err("unsorted");
    assert!(matches!(err, ChartError::UnsortedInput { index: 4, .. }));
    assert_eq!(engine.bars().len(), 30);
    assert_eq!(engine.source_bars().len(), 30);
    assert!(!engine.is_scroll_locked());
}

#[test]
fn json_bars_load_through_engine() {
    let mut engine = engine();
    engine
        .load_json_bars(
            r#"[
                {"date": "2021-01-04", "open": "10.5", "high": 11, "low": 9.5, "close": 10.8, "volume": 1200},
                {"date": "2021-01-05", "open": 10.8, "high": 11.2, "low": 10.1, "close": 10.2, "volume": "900"}
            ]"#,
        )
        .expect("load");
    assert_eq!(engine.bars().len(), 2);
    assert_eq!(engine.bars()[0].bar.open, Some(10.5));

    assert!(engine.load_json_bars(r#"[{"date": "04/01/2021"}]"#).is_err());
    assert!(engine.load_json_bars("not json").is_err());
    assert_eq!(engine.bars().len(), 2);
}

#[test]
fn time_range_filter_reruns_pipeline_on_source_bars() {
    let mut engine = engine();
    engine.set_bars(sample_bars(400)).expect("set bars");

    engine
        .set_time_range_filter(TimeRangeFilter::Last5Days)
        .expect("filter");
    assert_eq!(engine.time_range_filter(), TimeRangeFilter::Last5Days);
    assert_eq!(engine.bars().len(), 5);
    assert_eq!(engine.source_bars().len(), 400);
    assert_eq!(engine.time_scale().extent(), Some(Extent { start: 0, end: 4 }));
    assert!(engine.bars().iter().all(|bar| bar.value("ema12").is_none()));

    engine
        .set_time_range_filter(TimeRangeFilter::LastYearWeekly)
        .expect("weekly");
    let weekly = engine.bars();
    assert!(weekly.len() <= 53 && weekly.len() >= 51);
    assert!(weekly.windows(2).all(|pair| pair[0].date() < pair[1].date()));

    engine.set_time_range_filter(TimeRangeFilter::All).expect("all");
    assert_eq!(engine.bars().len(), 400);
}

#[test]
fn resize_and_extent_controls_relayout() {
    let mut engine = engine();
    engine.set_bars(sample_bars(200)).expect("set bars");

    assert_eq!(engine.set_extent(10, 59).expect("extent"), Some(Extent { start: 10, end: 59 }));
    engine.resize(Viewport::new(1000, 700)).expect("resize");
    assert_eq!(engine.time_scale().extent(), Some(Extent { start: 10, end: 59 }));
    assert_eq!(engine.plot_area().width, 900.0);
    assert_eq!(engine.layout().lowest().map(|pane| pane.bottom()), Some(670.0));

    assert!(engine.resize(Viewport::new(0, 700)).is_err());
    assert_eq!(engine.viewport(), Viewport::new(1000, 700));
    assert_eq!(engine.reset_extent().expect("reset"), Some(Extent { start: 50, end: 199 }));
}

#[test]
fn rejected_resize_keeps_previous_geometry() {
    let mut engine = engine();
    engine.set_bars(sample_bars(60)).expect("set bars");
    engine.pointer_enter();
    let viewport = engine.viewport();
    let plot = engine.plot_area();
    let layout = engine.layout().clone();
    let pixel_range = engine.time_scale().pixel_range();

    let err = engine.resize(Viewport::new(800, 250)).expect_err("overlapping panes");
    assert!(matches!(err, ChartError::PaneOverlap { pane } if pane == RSI_PANE_ID));
    assert_eq!(engine.viewport(), viewport);
    assert_eq!(engine.plot_area(), plot);
    assert_eq!(engine.layout(), &layout);
    assert_eq!(engine.time_scale().pixel_range(), pixel_range);
    assert!(!engine.is_scroll_locked());
}
