use log::{debug, info};
use std::time::Instant;
use wireraster::core::rasterizer::Rasterizer;
use wireraster::io::edge_report::EdgeReport;
use wireraster::io::render_settings::RenderSettings;
use wireraster::io::simple_cli::SimpleCli;

fn run(settings: &RenderSettings) -> Result<(), String> {
    let start_time = Instant::now();

    let object = settings.render_object()?;
    let camera = settings.camera_transform()?;
    debug!(
        "相机位置 {} 注视 {} (yaw {:.1}°, pitch {:.1}°)",
        camera.position, camera.target, camera.yaw, camera.pitch
    );

    let rasterizer = Rasterizer::new(settings.raster_config());
    let visible = rasterizer
        .draw_edges(&object, &camera)
        .map_err(|e| format!("渲染失败: {}", e))?;

    let report = EdgeReport::new(settings, object.triangles.len(), &visible);
    info!(
        "{} 投影 / {} 相机: {} 个三角形中 {} 个可见，共 {} 条边",
        report.projection,
        report.camera_mode,
        report.triangle_count,
        report.visible_count,
        report.edges.len()
    );

    match &settings.output {
        Some(path) => {
            report.save_to_file(path)?;
            info!("边数据已保存到 {}", path);
        }
        None => {
            for edge in &report.edges {
                println!(
                    "#{} ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                    edge.triangle, edge.from[0], edge.from[1], edge.to[0], edge.to[1]
                );
            }
        }
    }

    info!("总耗时: {:?}", start_time.elapsed());
    Ok(())
}

fn main() -> Result<(), String> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = SimpleCli::process()?;
    run(&settings)
}
