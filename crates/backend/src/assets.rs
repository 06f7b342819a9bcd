use hunterdash_shared::models::MapImage;
use std::path::Path;

pub fn load_map_image(assets_dir: &Path) -> Result<MapImage, String> {
    let path = assets_dir.join("map.json");
    let data = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let image: MapImage =
        serde_json::from_str(&data).map_err(|e| format!("Failed to parse map.json: {}", e))?;
    if !(image.width > 0.0 && image.height > 0.0) {
        return Err(format!(
            "map.json has invalid dimensions {}x{}",
            image.width, image.height
        ));
    }

    tracing::info!(
        file = %image.file_name,
        width = image.width,
        height = image.height,
        "Loaded map image metadata"
    );

    Ok(image)
}

/// Metadata used when `map.json` is missing or broken.
pub fn fallback_map_image() -> MapImage {
    MapImage {
        file_name: "map.png".to_string(),
        width: 2048.0,
        height: 2048.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_map_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("map.json"),
            r#"{"fileName":"valentine.webp","width":4096,"height":3072}"#,
        )
        .unwrap();
        let image = load_map_image(dir.path()).unwrap();
        assert_eq!(image.file_name, "valentine.webp");
        assert_eq!(image.width, 4096.0);
        assert_eq!(image.height, 3072.0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_map_image(dir.path()).is_err());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("map.json"),
            r#"{"fileName":"x.png","width":0,"height":100}"#,
        )
        .unwrap();
        assert!(load_map_image(dir.path()).is_err());
    }
}
