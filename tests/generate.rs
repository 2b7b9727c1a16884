use std::io::Cursor;

use favicon_renderer::{Configuration, FaviconGenerator, FaviconError, Platform, Source, favicons};
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{Value, json};

const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64"><rect width="64" height="64" fill="#e63946"/></svg>"##;

fn png(side: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(side, side, Rgba(color));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

fn options(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn raster_source_produces_exact_sizes() {
    let config = Configuration::new().with_platforms(&[Platform::Favicons]);
    let response = favicons(png(512, [0, 128, 0, 255]), config).await.unwrap();

    let names: Vec<_> = response.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["favicon.ico", "favicon-16x16.png", "favicon-32x32.png"]);

    let icon = decode(&response.image("favicon-32x32.png").unwrap().contents);
    assert_eq!(icon.dimensions(), (32, 32));
    assert_eq!(icon.get_pixel(16, 16).0, [0, 128, 0, 255]);

    let ico = image::load_from_memory_with_format(
        &response.image("favicon.ico").unwrap().contents,
        ImageFormat::Ico,
    )
    .unwrap();
    assert_eq!((ico.width(), ico.height()), (64, 64));
}

#[tokio::test]
async fn source_list_picks_the_best_fit() {
    // red small, blue large: the 16px favicon comes from the small one
    let source = Source::List(vec![
        Source::Bytes(png(16, [255, 0, 0, 255])),
        Source::Bytes(png(256, [0, 0, 255, 255])),
    ]);
    let config = Configuration::new().with_platforms(&[Platform::Favicons]);
    let response = favicons(source, config).await.unwrap();

    let small = decode(&response.image("favicon-16x16.png").unwrap().contents);
    assert_eq!(small.get_pixel(8, 8).0, [255, 0, 0, 255]);
    let large = decode(&response.image("favicon-32x32.png").unwrap().contents);
    assert_eq!(large.get_pixel(16, 16).0, [0, 0, 255, 255]);
}

#[tokio::test]
async fn source_can_be_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.svg");
    tokio::fs::write(&path, LOGO_SVG).await.unwrap();

    let config = Configuration::new().with_platforms(&[Platform::Yandex]);
    let response = favicons(path, config).await.unwrap();

    let icon = decode(&response.image("yandex-browser-50x50.png").unwrap().contents);
    assert_eq!(icon.dimensions(), (50, 50));
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Configuration::new().with_platforms(&[Platform::Favicons]);

    let err = favicons(dir.path().join("nope.png"), config).await.unwrap_err();
    assert!(matches!(err, FaviconError::Io { .. }));
}

#[tokio::test]
async fn manifests_and_html_use_absolute_urls() {
    let mut config = Configuration::new().with_platforms(&[
        Platform::Android,
        Platform::Favicons,
        Platform::Windows,
        Platform::Yandex,
    ]);
    config.path = "/static/icons/".into();
    config.app_name = Some("Demo".into());
    config.background = favicon_renderer::BackgroundSetting::Color("#123456".into());
    config.html_file = Some("head.html".into());

    let response = FaviconGenerator::new(config)
        .generate(LOGO_SVG.as_bytes())
        .await
        .unwrap();

    let manifest: Value =
        serde_json::from_str(&response.file("manifest.json").unwrap().contents).unwrap();
    assert_eq!(manifest["name"], "Demo");
    assert_eq!(manifest["short_name"], "Demo");
    assert_eq!(manifest["background_color"], "#123456");
    assert_eq!(
        manifest["icons"][0]["src"],
        "/static/icons/android-chrome-36x36.png"
    );

    let browserconfig = &response.file("browserconfig.xml").unwrap().contents;
    assert!(browserconfig.starts_with("<?xml"));
    assert!(browserconfig.contains(r#"src="/static/icons/mstile-150x150.png""#));
    assert!(browserconfig.contains("<TileColor>#123456</TileColor>"));

    let yandex: Value =
        serde_json::from_str(&response.file("yandex-browser-manifest.json").unwrap().contents)
            .unwrap();
    assert_eq!(yandex["layout"]["logo"], "/static/icons/yandex-browser-50x50.png");
    assert_eq!(yandex["api_version"], 1);

    assert!(
        response
            .html
            .iter()
            .any(|tag| tag.contains(r#"href="/static/icons/favicon.ico""#))
    );
    assert!(
        response
            .html
            .iter()
            .any(|tag| tag.contains(r#"name="application-name""#) && tag.contains(r#"content="Demo""#))
    );

    let head = response.file("head.html").unwrap();
    assert_eq!(head.contents.lines().count(), response.html.len());
}

#[tokio::test]
async fn firefox_mask_clips_corners() {
    let config = Configuration::new()
        .with_platforms(&[])
        .with_platform_options(Platform::Firefox, options(json!({ "mask": true, "offset": 10 })));

    let response = favicons(LOGO_SVG.as_bytes(), config).await.unwrap();

    let icon = decode(&response.image("firefox_app_128x128.png").unwrap().contents);
    assert_eq!(icon.dimensions(), (128, 128));
    assert_eq!(icon.get_pixel(0, 0)[3], 0);
    assert_eq!(icon.get_pixel(64, 64).0, [0xe6, 0x39, 0x46, 255]);
}

#[tokio::test]
async fn rotated_startup_images_keep_slot_size() {
    let config = Configuration::new().with_platforms(&[Platform::AppleStartup]);
    let response = favicons(LOGO_SVG.as_bytes(), config).await.unwrap();

    let rotated = decode(
        &response
            .image("apple-touch-startup-image-748x1024.png")
            .unwrap()
            .contents,
    );
    assert_eq!(rotated.dimensions(), (748, 1024));
    // opaque slot over the default white background
    assert_eq!(rotated.get_pixel(0, 0)[3], 255);
}

#[tokio::test]
async fn offset_too_large_for_wide_tile_fails_validation() {
    let config = Configuration::new()
        .with_platforms(&[Platform::Favicons])
        .with_platform_options(Platform::Windows, options(json!({ "offset": 30 })));

    // an unreadable source proves nothing was decoded before the error
    let err = favicons(Source::Bytes(b"not an image".to_vec()), config)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(
        err,
        FaviconError::InvalidOptionValue { ref option, .. } if option == "offset"
    ));
}

#[tokio::test]
async fn empty_source_list_is_rejected() {
    let err = favicons(Source::List(Vec::new()), Configuration::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FaviconError::EmptySource));
}
