//! Bar chart of filtered episode counts per year.

use image::ImageEncoder;
use plotters::prelude::*;

use crate::domain::models::YearCount;

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 500;
const TITLE: &str = "US Christmas TV Episodes by Year (filtered)";

/// Every year from the first to the last counted year, with missing years
/// as zero so the series has no holes.
pub fn continuous_series(counts: &[YearCount]) -> Vec<(u16, usize)> {
    let (Some(first), Some(last)) = (counts.first(), counts.last()) else {
        return Vec::new();
    };
    let mut known = counts.iter().peekable();
    (first.year..=last.year)
        .map(|year| match known.next_if(|yc| yc.year == year) {
            Some(yc) => (year, yc.count),
            None => (year, 0),
        })
        .collect()
}

/// Render the chart and return PNG bytes.
pub fn render_chart(counts: &[YearCount]) -> anyhow::Result<Vec<u8>> {
    let series = continuous_series(counts);
    let (x_min, x_max) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (u32::from(first.0), u32::from(last.0)),
        _ => (0, 0),
    };
    let max_y = series.iter().map(|(_, c)| *c as u32).max().unwrap_or(0);
    // Headroom above the tallest bar
    let y_top = (max_y + max_y / 10).max(max_y + 1);

    let mut buffer = vec![0; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let caption = if series.is_empty() {
            format!("{TITLE}: no entries")
        } else {
            TITLE.to_string()
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((x_min..x_max + 1).into_segmented(), 0u32..y_top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Year")
            .y_desc("Count")
            .x_labels(20)
            .label_style(("sans-serif", 14))
            .x_label_formatter(&|v| match v {
                SegmentValue::Exact(y) | SegmentValue::CenterOf(y) => y.to_string(),
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(RGBColor(178, 34, 34).filled())
                .margin(2)
                .data(series.iter().map(|(year, count)| (u32::from(*year), *count as u32))),
        )?;

        root.present()?;
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes).write_image(
        &buffer,
        WIDTH,
        HEIGHT,
        image::ColorType::Rgb8,
    )?;

    Ok(png_bytes)
}
