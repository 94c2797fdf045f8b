use axum::response::Html;
use chrono::Local;

use crate::AppState;
use crate::error::AppError;
use crate::models::UploadedImage;

/// Lists all uploaded images and their metadata, most recent first.
pub async fn list_images(state: &AppState) -> Result<Html<String>, AppError> {
    let images = state.store.list_images().await?;
    Ok(Html(render_page(&images)))
}

fn render_page(images: &[UploadedImage]) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n");
    page.push_str("<html lang=\"en\">\n");
    page.push_str("<head>\n<meta charset=\"utf-8\">\n<title>Image List</title>\n</head>\n");
    page.push_str("<body>\n<h1>Image List</h1>\n");

    if images.is_empty() {
        page.push_str("<h4>There are no images</h4>\n");
    } else {
        page.push_str("<table border=\"1\">");
        for (i, image) in images.iter().enumerate() {
            let date = image.modified.with_timezone(&Local).format("%D %r");
            page.push_str("<tr>");
            page.push_str(&format!("<td>{i}</td>"));
            page.push_str(&format!(
                "<td><a href=\"/i/{file}\"><img style=\"max-width: 500px;\" src=\"/i/{file}\"></a></td>",
                file = image.filename
            ));
            page.push_str(&format!("<td>{date}</td>"));
            page.push_str("</tr>\n");
        }
        page.push_str("</table>");
    }

    page.push_str("</body>\n</html>");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn image(filename: &str, ts: i64) -> UploadedImage {
        UploadedImage {
            filename: filename.to_string(),
            path: PathBuf::from("i").join(filename),
            modified: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_empty_page() {
        let page = render_page(&[]);
        assert!(page.contains("<h1>Image List</h1>"));
        assert!(page.contains("There are no images"));
        assert!(!page.contains("<table"));
    }

    #[test]
    fn test_render_rows_in_given_order() {
        let images = [image("newer.png", 1_700_000_100), image("older.jpg", 1_700_000_000)];
        let page = render_page(&images);

        assert!(page.contains("<td>0</td>"));
        assert!(page.contains("<td>1</td>"));
        assert!(page.contains("href=\"/i/newer.png\""));
        assert!(page.contains("src=\"/i/older.jpg\""));
        assert!(page.find("newer.png").unwrap() < page.find("older.jpg").unwrap());
    }
}
