use crate::chart::*;
use crate::selection::{Click, Field, Selection};
use log::*;
use sales_table::{AggregateRow, Cached, Dimension, Measure, OrderTable};
use serde_json::{json, Value};

/// Four panels over a year of orders, coupled by a City selection and a
/// Product selection.  Clicking a city bar filters the product panels to
/// that city; clicking a product filters the city bars to that product.
#[derive(Debug, Clone)]
pub struct LinkedDashboard {
    orders: OrderTable,
    measure: Measure,
    city: Selection,
    product: Selection,
}

/// A rendering of a [`LinkedDashboard`] for one pair of selections
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub city_bar: ChartSpec,
    pub product_bar: ChartSpec,
    pub trend: ChartSpec,
    pub pie: ChartSpec,
}

impl LinkedDashboard {
    pub fn new(orders: OrderTable, measure: Measure) -> LinkedDashboard {
        LinkedDashboard {
            orders,
            measure,
            city: Selection::new(Field::City),
            product: Selection::new(Field::Product),
        }
    }

    #[cfg(test)]
    pub fn city_selection(&self) -> &Selection {
        &self.city
    }

    #[cfg(test)]
    pub fn product_selection(&self) -> &Selection {
        &self.product
    }

    /// Swaps in new orders, keeping both selections
    pub fn set_orders(&mut self, orders: OrderTable) {
        self.orders = orders;
    }

    /// Each selection only reacts to clicks on its own field
    pub fn click(&mut self, click: &Click) {
        match click.field {
            Field::City => self.city.click(&click.key),
            Field::Product => self.product.click(&click.key),
        }
        debug!(
            "After {:?}: city={:?}, product={:?}",
            click,
            self.city.value(),
            self.product.value()
        );
    }

    pub fn render(&self, cache: &mut Cached) -> Dashboard {
        let by_product = self.product.apply(cache, &self.orders);
        let in_city = self.city.apply(cache, &self.orders);
        let cities = cache.group_by(&by_product, Dimension::City);
        let products = cache.group_by(&in_city, Dimension::Product);

        let city_trend = if self.city.is_empty() {
            None
        } else {
            Some(cache.group_by(&in_city, Dimension::Month))
        };
        let product_trend = if self.product.is_empty() {
            None
        } else {
            Some(cache.group_by(&by_product, Dimension::Month))
        };

        Dashboard {
            city_bar: self.city_bar(&cities),
            product_bar: self.product_bar(&products),
            trend: self.trend(city_trend.as_deref(), product_trend.as_deref()),
            pie: self.pie(&products),
        }
    }

    fn city_bar(&self, rows: &[AggregateRow]) -> ChartSpec {
        let measure = self.measure;
        let data = rows
            .iter()
            .map(|x| {
                let mut datum = datum(Dimension::City, x);
                mark_selection(&mut datum, &x.key.to_string(), &self.city);
                Value::Object(datum)
            })
            .collect();
        let title = Title::new(format!("{} by City", measure));
        ChartSpec::new(ChartKind::VerticalBar, title, data, 250)
            .width(350)
            .layer(Layer::new(
                json!({ "type": "bar" }),
                json!({
                    "x": {
                        "field": "City",
                        "type": "nominal",
                        "title": "",
                        "axis": { "labelAngle": -40, "labelOverlap": false },
                    },
                    "y": {
                        "field": measure.column(),
                        "type": "quantitative",
                        "title": measure.column(),
                    },
                    "color": highlight_color(Dimension::City, "tealblues"),
                    "tooltip": [
                        nominal(Dimension::City),
                        {
                            "field": measure.column(),
                            "type": "quantitative",
                            "format": ".0f",
                        },
                    ],
                }),
            ))
            .param(self.city.param())
    }

    /// Monthly totals for the selected city and for the selected product.
    /// A line only has data while its selection holds a value.
    fn trend(
        &self,
        city: Option<&[AggregateRow]>,
        product: Option<&[AggregateRow]>,
    ) -> ChartSpec {
        let measure = self.measure;
        let series = |rows: Option<&[AggregateRow]>| -> Vec<Value> {
            rows.unwrap_or_default()
                .iter()
                .map(|x| Value::Object(datum(Dimension::Month, x)))
                .collect()
        };
        let line = |y_title: String, color: Option<&str>| {
            let mut encoding = json!({
                "x": {
                    "field": "Month",
                    "type": "nominal",
                    "axis": { "labelAngle": -40, "labelOverlap": false },
                },
                "y": {
                    "field": measure.column(),
                    "type": "quantitative",
                    "title": y_title,
                },
                "tooltip": [
                    nominal(Dimension::Month),
                    {
                        "field": measure.column(),
                        "type": "quantitative",
                        "format": ".0f",
                    },
                ],
            });
            if let Some(color) = color {
                encoding["color"] = json!({ "value": color });
            }
            Layer::new(
                json!({ "type": "line", "point": { "size": 80, "opacity": 0.8 } }),
                encoding,
            )
        };
        let title = Title::new(format!("Total {} by Month", measure));
        ChartSpec::new(ChartKind::Trend, title, vec![], 250)
            .width(400)
            .layer(line(format!("{} in City", measure), None).with_data(series(city)))
            .layer(line(format!("{} of Product", measure), Some("red")).with_data(series(product)))
            .param(zoom(ChartKind::Trend, "y"))
            .resolve(json!({ "axis": { "y": "independent" } }))
    }

    fn pie(&self, rows: &[AggregateRow]) -> ChartSpec {
        let data = percentage_data(Dimension::Product, rows, self.measure)
            .into_iter()
            .zip(rows)
            .map(|(mut datum, row)| {
                mark_selection(&mut datum, &row.key.to_string(), &self.product);
                Value::Object(datum)
            })
            .collect();
        let title = Title::new(format!("Percentage of {}", self.measure))
            .with_subtitle("Distribution by Products");
        let theta = json!({ "field": "percentage", "type": "quantitative", "stack": true });
        ChartSpec::new(ChartKind::Pie, title, data, 300)
            .layer(Layer::new(
                json!({ "type": "arc", "padAngle": 0.01, "outerRadius": 110 }),
                json!({
                    "theta": theta,
                    "color": highlight_color(Dimension::Product, "tableau20"),
                    "opacity": {
                        "condition": { "test": "datum.highlight", "value": 1 },
                        "value": 0.1,
                    },
                    "tooltip": [
                        nominal(Dimension::Product),
                        { "field": "percentage", "type": "quantitative", "format": ".2f" },
                    ],
                }),
            ))
            .layer(Layer::new(
                json!({ "type": "text", "radius": 130 }),
                json!({
                    "theta": theta,
                    "text": {
                        "condition": {
                            "test": "datum.selected",
                            "field": "percentage",
                            "type": "quantitative",
                            "format": ".2f",
                        },
                        "value": "",
                    },
                    "size": {
                        "condition": { "test": "datum.selected", "value": 15 },
                        "value": 0,
                    },
                }),
            ))
            .param(self.product.param())
    }

    fn product_bar(&self, rows: &[AggregateRow]) -> ChartSpec {
        let measure = self.measure;
        let data = rows
            .iter()
            .map(|x| {
                let mut datum = datum(Dimension::Product, x);
                mark_selection(&mut datum, &x.key.to_string(), &self.product);
                Value::Object(datum)
            })
            .collect();
        let title = Title::new(format!("{} by Product", measure));
        let encoding = json!({
            "y": {
                "field": "Product",
                "type": "nominal",
                "title": "",
                "axis": { "labelOverlap": false },
            },
            "x": {
                "field": measure.column(),
                "type": "quantitative",
                "title": measure.column(),
            },
            "color": highlight_color(Dimension::Product, "yellowgreenblue"),
            "opacity": {
                "condition": { "test": "datum.highlight", "value": 1 },
                "value": 0.5,
            },
            "tooltip": [
                nominal(Dimension::Product),
                { "field": measure.column(), "type": "quantitative", "format": ".0f" },
            ],
            "text": {
                "condition": {
                    "test": "datum.selected",
                    "field": measure.column(),
                    "type": "quantitative",
                },
                "value": "",
            },
        });
        ChartSpec::new(ChartKind::HorizontalBar, title, data, 275)
            .width(400)
            .layer(Layer::new(json!({ "type": "bar" }), encoding.clone()))
            .layer(Layer::new(
                json!({ "type": "text", "align": "left", "dx": 5 }),
                encoding,
            ))
            .param(self.product.param())
    }
}

impl Dashboard {
    /// The pie and the product bars share `select_product`, so params are
    /// declared once at the top and bound to their views
    pub fn to_vega_lite(&self) -> Value {
        json!({
            "params": hoist_params(&self.panels()),
            "vconcat": [
                {
                    "hconcat": [self.city_bar.to_view(), self.product_bar.to_view()],
                    "resolve": { "scale": { "color": "independent" } },
                },
                {
                    "hconcat": [self.trend.to_view(), self.pie.to_view()],
                },
            ],
        })
    }

    pub fn panels(&self) -> [&ChartSpec; 4] {
        [&self.city_bar, &self.product_bar, &self.trend, &self.pie]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{orders, param_names, view_names};
    use approx::assert_relative_eq;

    fn click(x: &str) -> Click {
        x.parse().unwrap()
    }

    fn sum(chart: &ChartSpec, field: &str) -> f64 {
        chart.column(field).iter().map(|x| x.as_f64().unwrap()).sum()
    }

    #[test]
    fn nothing_selected() {
        let orders = orders();
        let dash = LinkedDashboard::new(orders.clone(), Measure::Sales);
        let out = dash.render(&mut Cached::new());
        assert_eq!(out.city_bar.title.text, "Sales by City");
        assert_eq!(out.product_bar.title.text, "Sales by Product");
        assert_eq!(out.trend.title.text, "Total Sales by Month");
        assert_eq!(out.pie.title.to_string(), "Percentage of Sales — Distribution by Products");

        // Every panel covers every order
        let total = orders.total(Measure::Sales);
        assert_relative_eq!(sum(&out.city_bar, "Sales"), total, max_relative = 1e-9);
        assert_relative_eq!(sum(&out.product_bar, "Sales"), total, max_relative = 1e-9);
        assert_relative_eq!(sum(&out.pie, "percentage"), 100., max_relative = 1e-9);
        // Everything is highlighted, nothing is selected
        for chart in [&out.city_bar, &out.product_bar, &out.pie] {
            assert!(chart.column("highlight").iter().all(|x| **x == json!(true)));
            assert!(chart.column("selected").iter().all(|x| **x == json!(false)));
        }
        // ...and the trend lines are hidden
        assert!(out.trend.layers.iter().all(|x| x.data.as_deref() == Some(&[][..])));
    }

    #[test]
    fn city_selection_filters_product_panels() {
        let mut dash = LinkedDashboard::new(orders(), Measure::QuantityOrdered);
        dash.click(&click("city Dallas"));
        let out = dash.render(&mut Cached::new());

        // The city bars still show every city, with Dallas highlighted
        assert_eq!(out.city_bar.column("City"), vec![&json!("Boston"), &json!("Dallas")]);
        assert_eq!(out.city_bar.column("highlight"), vec![&json!(false), &json!(true)]);

        // The product panels only count Dallas's orders
        assert_eq!(
            out.product_bar.column("Product"),
            vec![&json!("AA Batteries"), &json!("Lightning Cable"), &json!("iPhone")]
        );
        assert_eq!(
            out.product_bar.column("Quantity Ordered"),
            vec![&json!(4), &json!(1), &json!(1)]
        );
        assert_eq!(
            out.pie.column("percentage"),
            vec![&json!(100. * 4. / 6.), &json!(100. / 6.), &json!(100. / 6.)]
        );

        // Only the city line has data
        let city_line = out.trend.layers[0].data.as_ref().unwrap();
        assert_eq!(city_line.len(), 2);
        assert_eq!(city_line[0]["Month"], 3);
        assert_eq!(city_line[1]["Quantity Ordered"], 5);
        assert!(out.trend.layers[1].data.as_ref().unwrap().is_empty());

        let spec = out.to_vega_lite();
        assert_eq!(spec["params"][0]["name"], "select_city");
        assert_eq!(spec["params"][0]["value"][0]["City"], "Dallas");
    }

    #[test]
    fn product_selection_filters_city_bars() {
        let mut dash = LinkedDashboard::new(orders(), Measure::Sales);
        dash.click(&click("product iPhone"));
        let out = dash.render(&mut Cached::new());
        assert_eq!(out.city_bar.column("Sales"), vec![&json!(700.0), &json!(700.0)]);

        // The product panels aren't filtered by their own selection
        assert_eq!(out.product_bar.data.len(), 3);
        assert_eq!(
            out.product_bar.column("selected"),
            vec![&json!(false), &json!(false), &json!(true)]
        );
        assert_eq!(
            out.pie.column("highlight"),
            vec![&json!(false), &json!(false), &json!(true)]
        );

        let product_line = out.trend.layers[1].data.as_ref().unwrap();
        assert_eq!(product_line.len(), 2);
        assert!(out.trend.layers[0].data.as_ref().unwrap().is_empty());
    }

    #[test]
    fn selections_are_independent() {
        let mut dash = LinkedDashboard::new(orders(), Measure::Sales);
        dash.click(&click("city Boston"));
        dash.click(&click("product iPhone"));
        assert_eq!(dash.city_selection().value(), Some("Boston"));
        assert_eq!(dash.product_selection().value(), Some("iPhone"));

        // Clicking the selected city again clears it, leaving the product
        dash.click(&click("city Boston"));
        assert!(dash.city_selection().is_empty());
        assert_eq!(dash.product_selection().value(), Some("iPhone"));

        dash.click(&click("product AA Batteries"));
        assert_eq!(dash.product_selection().value(), Some("AA Batteries"));
    }

    #[test]
    fn rerendering_hits_the_cache() {
        let mut dash = LinkedDashboard::new(orders(), Measure::Sales);
        let mut cache = Cached::new();
        dash.click(&click("city Boston"));
        let first = dash.render(&mut cache);
        let (_, misses) = cache.stats();
        let second = dash.render(&mut cache);
        assert_eq!(first, second);
        assert_eq!(cache.stats().1, misses);
    }

    #[test]
    fn layout() {
        let dash = LinkedDashboard::new(orders(), Measure::Sales);
        let spec = dash.render(&mut Cached::new()).to_vega_lite();
        let top = &spec["vconcat"][0];
        assert_eq!(top["resolve"]["scale"]["color"], "independent");
        assert_eq!(top["hconcat"][0]["title"]["text"], "Sales by City");
        assert_eq!(top["hconcat"][1]["layer"][0]["name"], "hbar_view");
        let bottom = &spec["vconcat"][1]["hconcat"];
        assert_eq!(bottom[0]["resolve"]["axis"]["y"], "independent");
        assert_eq!(bottom[0]["layer"][1]["encoding"]["color"]["value"], "red");
        assert_eq!(bottom[1]["layer"][1]["mark"]["radius"], 130);
    }

    #[test]
    fn params_are_declared_once() {
        let mut dash = LinkedDashboard::new(orders(), Measure::Sales);
        dash.click(&click("product iPhone"));
        let spec = dash.render(&mut Cached::new()).to_vega_lite();
        assert_eq!(
            param_names(&spec),
            vec!["select_city", "select_product", "trend_zoom"]
        );
        let product = &spec["params"][1];
        assert_eq!(product["views"], json!(["hbar_view", "pie_view"]));
        assert_eq!(product["value"][0]["Product"], "iPhone");
        // Every view a param is bound to exists
        let views = view_names(&spec);
        for param in spec["params"].as_array().unwrap() {
            for view in param["views"].as_array().unwrap() {
                assert!(views.contains(&view.as_str().unwrap().to_string()));
            }
        }
    }
}
