use crate::document::Page;
use crate::extractors::{extract_content, extract_images, extract_links, extract_videos};
use crate::results::{LinkCategory, LinkKind, ListKind, VideoKind, VideoPlatform};

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page::from_html(html, "https://a.com/dir/page.html").unwrap()
    }

    #[test]
    fn test_mixed_page() {
        let page = page(
            r#"<h1>Title</h1><p>Paragraph with more than twenty characters here.</p><a href="mailto:x@y.com">Mail</a><a href="/about">About</a><a href="https://other.com">Ext</a>"#,
        );

        let content = extract_content(&page).unwrap();
        assert_eq!(content.headings.len(), 1);
        assert_eq!(content.headings[0].level, 1);
        assert_eq!(content.headings[0].text, "Title");
        assert_eq!(
            content.paragraphs,
            vec!["Paragraph with more than twenty characters here."]
        );

        let links = extract_links(&page).unwrap();
        let email = links.links(LinkCategory::Email);
        assert_eq!(email.len(), 1);
        assert_eq!(
            email[0].kind,
            LinkKind::Email {
                email: "x@y.com".into()
            }
        );

        let internal = links.links(LinkCategory::Internal);
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].url, "https://a.com/about");
        assert_eq!(internal[0].original_href, "/about");

        assert_eq!(links.links(LinkCategory::External).len(), 1);
        assert_eq!(links.totals().total, 3);
    }

    #[test]
    fn test_source_only_video() {
        let page = page(r#"<video><source src="a.mp4" type="video/mp4"></video>"#);
        let videos = extract_videos(&page).unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].url, "https://a.com/dir/a.mp4");
        assert_eq!(videos[0].sources.len(), 1);
        assert_eq!(videos[0].sources[0].mime_type, "video/mp4");
        assert_eq!(videos[0].kind, VideoKind::Native);
    }

    #[test]
    fn test_youtube_embed_and_ad_iframe() {
        let videos =
            extract_videos(&page(r#"<iframe src="https://www.youtube.com/embed/xyz"></iframe>"#))
                .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].kind, VideoKind::Embedded);
        assert_eq!(videos[0].platform, Some(VideoPlatform::YouTube));
        assert_eq!(videos[0].width, "560");
        assert_eq!(videos[0].height, "315");
        assert_eq!(videos[0].sources[0].mime_type, "iframe");

        let videos =
            extract_videos(&page(r#"<iframe src="https://example.com/ad"></iframe>"#)).unwrap();
        assert!(videos.is_empty());
    }

    #[test]
    fn test_nested_lists_with_empty_list() {
        let content = extract_content(&page(
            "<body><ul><li>one</li><li>two</li><li>three<ul></ul></li></ul></body>",
        ))
        .unwrap();
        assert_eq!(content.lists.len(), 1);
        assert_eq!(content.lists[0].kind, ListKind::Unordered);
        assert_eq!(content.lists[0].items, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_relative_image_resolution() {
        let images = extract_images(&page(r#"<img src="../img.png">"#)).unwrap();
        assert_eq!(images[0].url, "https://a.com/img.png");
    }

    #[test]
    fn test_passes_are_independent_on_one_page() {
        let page = page(
            r#"<title>Gallery</title>
               <img src="/a.jpg"><div style="background-image: url(/b.jpg)"></div>
               <video src="/c.mp4"></video>
               <a href="/d.pdf">PDF</a>"#,
        );

        let images = extract_images(&page).unwrap();
        let videos = extract_videos(&page).unwrap();
        let links = extract_links(&page).unwrap();
        let content = extract_content(&page).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(videos.len(), 1);
        assert_eq!(links.links(LinkCategory::File).len(), 1);
        assert_eq!(content.title, "Gallery");
    }
}
