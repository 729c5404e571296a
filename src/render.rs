//! HTML page rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! every interpolated file or folder name is escaped automatically.
//!
//! ## Pages
//!
//! - **Home** (`/`): one link per configured root
//! - **Gallery** (`/dir/<root>/...`): folder links, a filter form, and the
//!   image grid; each cell shows a server-side thumbnail at its display size
//!   and links to the original file
//! - **Error**: small page with a generic message for a failed request
//!
//! The stylesheet is embedded at compile time from `assets/style.css`.

use crate::listing::{FolderEntry, Gallery, ImageEntry};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../assets/style.css");

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn site_header(breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                a href="/" { "Gallery" }
                (breadcrumb)
            }
        }
    }
}

fn folder_list(folders: &[FolderEntry]) -> Markup {
    html! {
        @if !folders.is_empty() {
            ul.folder-list {
                @for folder in folders {
                    li { a href=(folder.path) { (folder.name) } }
                }
            }
        }
    }
}

/// URL of the server-side thumbnail for a grid cell.
pub fn thumbnail_src(image: &ImageEntry) -> String {
    format!("{}?w={}&h={}", image.src, image.width, image.height)
}

/// Renders the home page with one folder per root
pub fn render_home(folders: &[FolderEntry]) -> Markup {
    let content = html! {
        (site_header(html! {}))
        main.home-page {
            h1 { "Folders" }
            (folder_list(folders))
        }
    };
    base_document("Gallery", content)
}

/// Renders a gallery page: folders, filter form, and the image grid
pub fn render_gallery(title: &str, gallery: &Gallery, filter: Option<&str>) -> Markup {
    let content = html! {
        (site_header(html! { " › " (title) }))
        main.gallery-page {
            (folder_list(&gallery.folders))
            form.filter-form method="get" {
                input type="text" name="filter" value=[filter] placeholder="Filter by name (regex)";
                " "
                button type="submit" { "Filter" }
            }
            @if gallery.images.is_empty() {
                p.empty { "No images here." }
            } @else {
                table.image-grid {
                    @for row in &gallery.images {
                        tr {
                            @for image in row {
                                td {
                                    a href=(image.src) {
                                        img src=(thumbnail_src(image))
                                            width=(image.width)
                                            height=(image.height)
                                            alt=(image.name)
                                            loading="lazy";
                                    }
                                    div.caption { (image.name) }
                                }
                            }
                            @if row.len() < gallery.cols {
                                td colspan=(gallery.cols - row.len()) {}
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(title, content)
}

/// Renders an error page with a short, non-sensitive message
pub fn render_error(status: u16, message: &str) -> Markup {
    let content = html! {
        (site_header(html! {}))
        div.error-box {
            h2 { "Error " (status) }
            p { (message) }
        }
    };
    base_document("Error", content)
}
