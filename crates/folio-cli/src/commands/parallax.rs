use anyhow::Result;

use folio_core::parallax::{compute_transform, progress, ElementGeometry, ParallaxConfig};

pub fn run(scroll: u32, top: i64, height: u32, viewport: u32, config: &ParallaxConfig) -> Result<()> {
    let geometry = ElementGeometry::new(top, height, viewport);
    let translation = compute_transform(scroll, &geometry, config);

    println!("progress:   {:.4}", progress(scroll, &geometry));
    println!("offset:     {:.4}px", translation.px);
    println!("transform:  {}", translation.to_css());

    Ok(())
}
