use stockchart::api::{ATR_PANE_ID, ChartConfig, PRICE_PANE_ID, RSI_PANE_ID, default_panes};
use stockchart::core::{
    DomainPolicy, PaneId, PaneLayout, PaneOrigin, PaneSpec, ValueDomain, Viewport,
};
use stockchart::ChartError;

fn fixed() -> DomainPolicy {
    DomainPolicy::Fixed {
        min: 0.0,
        max: 100.0,
    }
}

#[test]
fn default_dashboard_stacks_price_rsi_and_atr() {
    let plot = ChartConfig::default().validate().expect("plot");
    let layout =
        PaneLayout::compute(&default_panes(), plot.top, plot.height, &[], None).expect("layout");

    let ids: Vec<PaneId> = layout.iter().map(|pane| pane.pane_id).collect();
    assert_eq!(ids, [PRICE_PANE_ID, RSI_PANE_ID, ATR_PANE_ID]);

    let price = layout.get(PRICE_PANE_ID).expect("price");
    let rsi = layout.get(RSI_PANE_ID).expect("rsi");
    let atr = layout.get(ATR_PANE_ID).expect("atr");
    assert_eq!((price.origin_y, price.height), (20.0, 300.0));
    assert_eq!((rsi.origin_y, rsi.height), (320.0, 125.0));
    assert_eq!((atr.origin_y, atr.height), (445.0, 125.0));
    assert_eq!(atr.bottom(), plot.bottom());

    assert_eq!(rsi.y_domain, Some(ValueDomain { min: 0.0, max: 100.0 }));
    assert_eq!(price.y_domain, None);
    assert_eq!(layout.lowest().map(|pane| pane.pane_id), Some(ATR_PANE_ID));
}

#[test]
fn pane_lookup_by_y_uses_half_open_bands() {
    let plot = ChartConfig::default().validate().expect("plot");
    let layout =
        PaneLayout::compute(&default_panes(), plot.top, plot.height, &[], None).expect("layout");

    assert_eq!(layout.pane_at(20.0).map(|p| p.pane_id), Some(PRICE_PANE_ID));
    assert_eq!(layout.pane_at(319.9).map(|p| p.pane_id), Some(PRICE_PANE_ID));
    assert_eq!(layout.pane_at(320.0).map(|p| p.pane_id), Some(RSI_PANE_ID));
    assert_eq!(layout.pane_at(500.0).map(|p| p.pane_id), Some(ATR_PANE_ID));
    assert_eq!(layout.pane_at(10.0), None);
    assert_eq!(layout.pane_at(580.0), None);
}

#[test]
fn fixed_domain_maps_values_top_to_bottom() {
    let plot = ChartConfig::default().validate().expect("plot");
    let layout =
        PaneLayout::compute(&default_panes(), plot.top, plot.height, &[], None).expect("layout");
    let rsi = layout.get(RSI_PANE_ID).expect("rsi");

    assert!((rsi.value_to_y(100.0).expect("top") - 320.0).abs() <= 1e-9);
    assert!((rsi.value_to_y(0.0).expect("bottom") - 445.0).abs() <= 1e-9);
    let y = rsi.value_to_y(70.0).expect("70");
    assert!((rsi.y_to_value(y).expect("back") - 70.0).abs() <= 1e-9);
}

#[test]
fn overlapping_origin_truncates_previous_pane() {
    let specs = [
        PaneSpec::new(PaneId::new(0), 300.0, fixed()),
        PaneSpec::new(PaneId::new(1), 100.0, fixed()).with_origin(PaneOrigin::FromBottom(150.0)),
    ];
    let layout = PaneLayout::compute(&specs, 0.0, 400.0, &[], None).expect("layout");

    let top = layout.get(PaneId::new(0)).expect("top");
    let bottom = layout.get(PaneId::new(1)).expect("bottom");
    assert_eq!(top.height, 250.0);
    assert_eq!(bottom.origin_y, 250.0);
}

#[test]
fn origin_above_previous_pane_is_an_overlap_error() {
    let specs = [
        PaneSpec::new(PaneId::new(0), 100.0, fixed()).with_origin(PaneOrigin::FromTop(50.0)),
        PaneSpec::new(PaneId::new(1), 100.0, fixed()).with_origin(PaneOrigin::FromTop(10.0)),
    ];
    let err = PaneLayout::compute(&specs, 0.0, 400.0, &[], None).expect_err("overlap");
    assert!(matches!(err, ChartError::PaneOverlap { pane } if pane == PaneId::new(1)));
}

#[test]
fn short_viewport_truncates_price_pane_above_indicator_panes() {
    let config = ChartConfig::new(Viewport::new(800, 400));
    let plot = config.validate().expect("plot");
    let layout =
        PaneLayout::compute(&config.panes, plot.top, plot.height, &[], None).expect("layout");

    let price = layout.get(PRICE_PANE_ID).expect("price");
    let rsi = layout.get(RSI_PANE_ID).expect("rsi");
    let atr = layout.get(ATR_PANE_ID).expect("atr");
    assert_eq!((price.origin_y, price.height), (20.0, 100.0));
    assert_eq!((rsi.origin_y, rsi.height), (120.0, 125.0));
    assert_eq!(atr.bottom(), plot.bottom());
}
