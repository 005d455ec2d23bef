use crate::selection::Selection;
use sales_table::{percentage_of_total, AggregateRow, Dimension, Measure, ALL};
use serde_json::{json, Map, Value};
use std::fmt;

pub const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
/// The colour of marks outside the current selection
pub const DIMMED: &str = "lightgray";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    HorizontalBar,
    VerticalBar,
    Area,
    Pie,
    /// Two monthly lines sharing an x axis
    Trend,
}

impl ChartKind {
    fn slug(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::HorizontalBar => "hbar",
            ChartKind::VerticalBar => "vbar",
            ChartKind::Area => "area",
            ChartKind::Pie => "pie",
            ChartKind::Trend => "trend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub text: String,
    pub subtitle: Option<String>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Title {
        Title {
            text: text.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Title {
        self.subtitle = Some(subtitle.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut title = json!({ "text": self.text, "anchor": "middle" });
        if let Some(subtitle) = &self.subtitle {
            title["subtitle"] = json!(subtitle);
        }
        title
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)?;
        if let Some(subtitle) = &self.subtitle {
            write!(f, " — {}", subtitle)?;
        }
        Ok(())
    }
}

/// One mark drawn over the chart's data (or over its own, if `data` is set)
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub mark: Value,
    pub encoding: Value,
    pub data: Option<Vec<Value>>,
}

impl Layer {
    pub fn new(mark: Value, encoding: Value) -> Layer {
        Layer {
            mark,
            encoding,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Vec<Value>) -> Layer {
        self.data = Some(data);
        self
    }

    fn to_json(&self) -> Value {
        let mut layer = json!({ "mark": self.mark, "encoding": self.encoding });
        if let Some(data) = &self.data {
            layer["data"] = json!({ "values": data });
        }
        layer
    }
}

/// A declarative description of one chart.  The data rows are fully
/// resolved: derived fields (percentages, selection flags) are computed
/// before the spec is built, so the renderer only has to draw them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Title,
    pub data: Vec<Value>,
    pub layers: Vec<Layer>,
    /// Interaction parameters.  These go on the first layer.
    pub params: Vec<Value>,
    pub height: u32,
    pub width: Option<u32>,
    pub resolve: Option<Value>,
}

impl ChartSpec {
    pub(crate) fn new(kind: ChartKind, title: Title, data: Vec<Value>, height: u32) -> ChartSpec {
        ChartSpec {
            kind,
            title,
            data,
            layers: vec![],
            params: vec![],
            height,
            width: None,
            resolve: None,
        }
    }

    pub(crate) fn layer(mut self, layer: Layer) -> ChartSpec {
        self.layers.push(layer);
        self
    }

    pub(crate) fn param(mut self, param: Value) -> ChartSpec {
        self.params.push(param);
        self
    }

    pub(crate) fn width(mut self, width: u32) -> ChartSpec {
        self.width = Some(width);
        self
    }

    pub(crate) fn resolve(mut self, resolve: Value) -> ChartSpec {
        self.resolve = Some(resolve);
        self
    }

    /// The values of `field` in the chart's data, in row order
    #[cfg(test)]
    pub fn column(&self, field: &str) -> Vec<&Value> {
        self.data.iter().map(|x| &x[field]).collect()
    }

    /// The name of the view the chart's params are bound to
    pub fn view_name(&self) -> String {
        format!("{}_view", self.kind.slug())
    }

    /// The chart as one view of a larger document.  Its params are left out:
    /// the document declares them once, see [`hoist_params`].
    pub fn to_view(&self) -> Value {
        let mut view = self.to_vega_lite();
        let first = view.get_mut("layer").and_then(|x| x.get_mut(0));
        if let Some(first) = first.and_then(Value::as_object_mut) {
            first.remove("params");
        }
        if let Some(view) = view.as_object_mut() {
            view.remove("params");
        }
        view
    }

    /// A standalone document, with the params on the chart itself
    pub fn to_vega_lite(&self) -> Value {
        let mut spec = json!({
            "title": self.title.to_json(),
            "height": self.height,
            "data": { "values": self.data },
        });
        if let Some(width) = self.width {
            spec["width"] = json!(width);
        }
        match self.layers.as_slice() {
            [layer] => {
                spec["name"] = json!(self.view_name());
                spec["mark"] = layer.mark.clone();
                spec["encoding"] = layer.encoding.clone();
                if let Some(data) = &layer.data {
                    spec["data"] = json!({ "values": data });
                }
                if !self.params.is_empty() {
                    spec["params"] = json!(self.params);
                }
            }
            layers => {
                let mut layers = layers.iter().map(Layer::to_json).collect::<Vec<_>>();
                if let Some(first) = layers.first_mut() {
                    first["name"] = json!(self.view_name());
                    if !self.params.is_empty() {
                        first["params"] = json!(self.params);
                    }
                }
                spec["layer"] = json!(layers);
            }
        }
        if let Some(resolve) = &self.resolve {
            spec["resolve"] = resolve.clone();
        }
        spec
    }
}

/// The params of every chart, declared once each with the views they're
/// bound to.  Charts that share a selection share its param.
pub fn hoist_params(charts: &[&ChartSpec]) -> Vec<Value> {
    let mut params: Vec<Value> = vec![];
    for chart in charts {
        for param in &chart.params {
            let view = json!(chart.view_name());
            match params.iter_mut().find(|x| x["name"] == param["name"]) {
                Some(existing) => {
                    if let Some(views) = existing["views"].as_array_mut() {
                        views.push(view);
                    }
                }
                None => {
                    let mut param = param.clone();
                    param["views"] = json!([view]);
                    params.push(param);
                }
            }
        }
    }
    params
}

/// A data row for an aggregate: the key column plus both measures
pub(crate) fn datum(dimension: Dimension, row: &AggregateRow) -> Map<String, Value> {
    let mut datum = Map::new();
    datum.insert(dimension.column().into(), json!(row.key));
    datum.insert(
        Measure::QuantityOrdered.column().into(),
        json!(row.quantity_ordered),
    );
    datum.insert(Measure::Sales.column().into(), json!(row.sales));
    datum
}

/// Data rows with a "percentage" field: each row's share of the measure
pub(crate) fn percentage_data(
    dimension: Dimension,
    rows: &[AggregateRow],
    measure: Measure,
) -> Vec<Map<String, Value>> {
    rows.iter()
        .zip(percentage_of_total(rows, measure))
        .map(|(row, pc)| {
            let mut datum = datum(dimension, row);
            datum.insert("percentage".into(), json!(pc));
            datum
        })
        .collect()
}

/// Adds the "highlight" and "selected" flags for `selection`
pub(crate) fn mark_selection(datum: &mut Map<String, Value>, key: &str, selection: &Selection) {
    datum.insert("highlight".into(), json!(selection.highlights(key)));
    datum.insert("selected".into(), json!(selection.selects(key)));
}

pub(crate) fn nominal(dimension: Dimension) -> Value {
    json!({ "field": dimension.column(), "type": "nominal" })
}

pub(crate) fn quantitative(measure: Measure) -> Value {
    json!({ "field": measure.column(), "type": "quantitative" })
}

/// Full colour from `scheme` while `selection` is empty or holds the mark's
/// key, grey otherwise.  The surface evaluates this on each click.
pub(crate) fn selected_color(dimension: Dimension, selection: &Selection, scheme: &str) -> Value {
    json!({
        "condition": {
            "param": selection.name(),
            "empty": true,
            "field": dimension.column(),
            "type": "nominal",
            "scale": { "scheme": scheme },
            "legend": null,
        },
        "value": DIMMED,
    })
}

/// Full colour from `scheme` for highlighted marks, grey for the rest
pub(crate) fn highlight_color(dimension: Dimension, scheme: &str) -> Value {
    json!({
        "condition": {
            "test": "datum.highlight",
            "field": dimension.column(),
            "type": "nominal",
            "scale": { "scheme": scheme },
            "legend": null,
        },
        "value": DIMMED,
    })
}

/// Pan and zoom along the quantitative axis
pub(crate) fn zoom(kind: ChartKind, axis: &str) -> Value {
    json!({
        "name": format!("{}_zoom", kind.slug()),
        "select": { "type": "interval", "encodings": [axis] },
        "bind": "scales",
    })
}

pub fn line_chart(rows: &[AggregateRow], measure: Measure, month: &str) -> ChartSpec {
    let data = rows
        .iter()
        .map(|x| Value::Object(datum(Dimension::Day, x)))
        .collect();
    let title = Title::new(format!("{} in {}", measure, month));
    ChartSpec::new(ChartKind::Line, title, data, 400)
        .layer(Layer::new(
            json!({
                "type": "line",
                "point": { "size": 80, "filled": true, "opacity": 0.8 },
            }),
            json!({
                "x": {
                    "field": "Day",
                    "type": "nominal",
                    "title": "Day",
                    "sort": null,
                    "axis": { "labelAngle": 0 },
                },
                "y": {
                    "field": measure.column(),
                    "type": "quantitative",
                    "scale": { "zero": false },
                },
                "tooltip": [nominal(Dimension::Day), quantitative(measure)],
            }),
        ))
        .param(zoom(ChartKind::Line, "y"))
}

pub fn hbar_chart(rows: &[AggregateRow], measure: Measure, month: &str) -> ChartSpec {
    let data = rows
        .iter()
        .map(|x| Value::Object(datum(Dimension::Product, x)))
        .collect();
    let title = Title::new(format!("{} by Products in {}", measure, month));
    let encoding = json!({
        "x": quantitative(measure),
        "y": {
            "field": "Product",
            "type": "nominal",
            "title": "",
            "axis": { "labelOverlap": false },
        },
        "color": {
            "field": "Product",
            "type": "nominal",
            "scale": { "scheme": "yellowgreenblue" },
            "legend": null,
        },
        "text": quantitative(measure),
        "tooltip": [nominal(Dimension::Product), quantitative(measure)],
    });
    ChartSpec::new(ChartKind::HorizontalBar, title, data, 400)
        .layer(Layer::new(json!({ "type": "bar" }), encoding.clone()))
        .layer(Layer::new(
            json!({ "type": "text", "align": "left", "dx": 4 }),
            encoding,
        ))
        .param(zoom(ChartKind::HorizontalBar, "x"))
}

/// One bar per city.  Bars outside `selection` are greyed out.
pub fn vbar_chart(
    rows: &[AggregateRow],
    measure: Measure,
    month: &str,
    selection: &Selection,
) -> ChartSpec {
    let data = rows
        .iter()
        .map(|x| {
            let mut datum = datum(Dimension::City, x);
            mark_selection(&mut datum, &x.key.to_string(), selection);
            Value::Object(datum)
        })
        .collect();
    let title = Title::new(format!("{} by cities in {}", measure, month));
    ChartSpec::new(ChartKind::VerticalBar, title, data, 350)
        .layer(Layer::new(
            json!({ "type": "bar" }),
            json!({
                "x": {
                    "field": "City",
                    "type": "nominal",
                    "title": "",
                    "axis": { "labelAngle": -40, "labelOverlap": false },
                },
                "y": quantitative(measure),
                "color": selected_color(Dimension::City, selection, "tealblues"),
                "opacity": { "value": 1 },
                "tooltip": [nominal(Dimension::City), quantitative(measure)],
            }),
        ))
        .param(selection.param())
        .param(zoom(ChartKind::VerticalBar, "y"))
}

/// Daily totals for a single city, as a gradient-filled area
pub fn area_chart(rows: &[AggregateRow], measure: Measure, city: &str, month: &str) -> ChartSpec {
    let data = rows
        .iter()
        .map(|x| Value::Object(datum(Dimension::Day, x)))
        .collect();
    let title =
        Title::new(format!("{} in {} in {}", measure, city, month)).with_subtitle("Distribution by Days");
    ChartSpec::new(ChartKind::Area, title, data, 350)
        .layer(Layer::new(
            json!({
                "type": "area",
                "line": { "color": "darkgreen" },
                "color": {
                    "gradient": "linear",
                    "stops": [
                        { "offset": 0, "color": "white" },
                        { "offset": 1, "color": "darkgreen" },
                    ],
                    "x1": 1,
                    "x2": 1,
                    "y1": 1,
                    "y2": 0.2,
                },
            }),
            json!({
                "x": {
                    "field": "Day",
                    "type": "nominal",
                    "title": "Day",
                    "axis": { "labelAngle": 0, "labelOverlap": true },
                },
                "y": {
                    "field": measure.column(),
                    "type": "quantitative",
                    "scale": { "zero": false },
                },
                "tooltip": [nominal(Dimension::Day), quantitative(measure)],
            }),
        ))
        .param(zoom(ChartKind::Area, "y"))
}

/// Each group's share of the measure.  With a specific city chosen, `rows`
/// are per product; with "All" cities, they're per city.
pub fn pie_chart(rows: &[AggregateRow], measure: Measure, city: &str) -> ChartSpec {
    let (dimension, subtitle) = if city == ALL {
        (Dimension::City, "Distribution by Cities")
    } else {
        (Dimension::Product, "Distribution by Products")
    };
    let data = percentage_data(dimension, rows, measure)
        .into_iter()
        .map(Value::Object)
        .collect();
    let title = Title::new(format!("Percentage of {}", measure)).with_subtitle(subtitle);
    ChartSpec::new(ChartKind::Pie, title, data, 300).layer(Layer::new(
        json!({ "type": "arc", "padAngle": 0.02 }),
        json!({
            "theta": { "field": "percentage", "type": "quantitative" },
            "color": {
                "field": dimension.column(),
                "type": "nominal",
                "scale": { "scheme": "tableau20" },
                "legend": null,
            },
            "tooltip": [
                nominal(dimension),
                { "field": "percentage", "type": "quantitative", "format": ".2f" },
            ],
        }),
    ))
}
