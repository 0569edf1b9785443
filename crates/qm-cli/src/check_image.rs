use qm_core::AppConfig;
use qm_vision::{ImageCheckRequest, ImageChecker, WatermarkChecker};

/// Checks one image URL and prints the verdict.
pub(crate) async fn run_check_image(
    config: &AppConfig,
    url: &str,
    product_id: &str,
    product_name: &str,
) -> anyhow::Result<()> {
    let checker = WatermarkChecker::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to configure image checker: {e}"))?;

    let request = ImageCheckRequest {
        image_url: url,
        product_id,
        product_name,
    };
    match checker.check_image(&request).await? {
        Some(finding) => {
            println!("watermark: yes");
            println!("{}", finding.message);
            if let Some(raw) = finding.details {
                println!("model response: {raw}");
            }
        }
        None => println!("watermark: no"),
    }

    Ok(())
}
