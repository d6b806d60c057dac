//! OPC package assembly: fixed parts (master, layout, theme) plus the
//! per-deck parts, written into a ZIP archive.

use crate::deck::Deck;
use crate::shape::{fmt_err, xml_text};
use deckgen_core::theme::{palette, Rgb, SLIDE_HEIGHT, SLIDE_WIDTH};
use deckgen_core::{Error, Result, TextRole};
use std::fmt::Write as FmtWrite;
use std::io::{Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const PML_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);
const RELS_OPEN: &str =
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#;
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const EMPTY_SP_TREE: &str = concat!(
    r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#
);

/// Content types used in the package.
mod content_type {
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const CHART: &str = "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";
    pub const CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const APP_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

pub(crate) fn media_part_name(index: usize, ext: &str) -> String {
    format!("ppt/media/image{}.{}", index + 1, ext)
}

pub(crate) fn chart_part_name(index: usize) -> String {
    format!("ppt/charts/chart{}.xml", index + 1)
}

/// Write the complete package for `deck` into `writer`.
pub(crate) fn write_package<W: Write + Seek>(deck: &Deck, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let put = |zip: &mut ZipWriter<W>, name: &str, data: &[u8]| -> Result<()> {
        zip.start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        zip.write_all(data)?;
        Ok(())
    };

    put(&mut zip, "[Content_Types].xml", content_types_xml(deck)?.as_bytes())?;
    put(&mut zip, "_rels/.rels", package_rels_xml().as_bytes())?;
    put(&mut zip, "docProps/core.xml", core_props_xml(deck).as_bytes())?;
    put(&mut zip, "docProps/app.xml", app_props_xml(deck)?.as_bytes())?;
    put(&mut zip, "ppt/presentation.xml", presentation_xml(deck)?.as_bytes())?;
    put(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(deck)?.as_bytes(),
    )?;
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml", slide_master_xml().as_bytes())?;
    put(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        slide_master_rels_xml().as_bytes(),
    )?;
    put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", slide_layout_xml().as_bytes())?;
    put(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        slide_layout_rels_xml().as_bytes(),
    )?;
    put(&mut zip, "ppt/theme/theme1.xml", theme_xml().as_bytes())?;

    for (idx, slide) in deck.slides().iter().enumerate() {
        put(
            &mut zip,
            &format!("ppt/slides/slide{}.xml", idx + 1),
            slide.to_xml()?.as_bytes(),
        )?;
        let rels = slide.rels_xml(
            |m| format!("../media/image{}.{}", m + 1, deck.media_ext(m)),
            |c| format!("../charts/chart{}.xml", c + 1),
        )?;
        put(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", idx + 1),
            rels.as_bytes(),
        )?;
    }

    for (idx, media) in deck.media().iter().enumerate() {
        put(&mut zip, &media_part_name(idx, media.ext), &media.bytes)?;
    }

    for (idx, chart) in deck.charts().iter().enumerate() {
        put(&mut zip, &chart_part_name(idx), chart.to_xml()?.as_bytes())?;
    }

    zip.finish()
        .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
}

fn content_types_xml(deck: &Deck) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    write!(
        xml,
        r#"<Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="application/xml"/>"#,
        content_type::RELATIONSHIPS
    )
    .map_err(fmt_err)?;
    xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    xml.push_str(r#"<Default Extension="gif" ContentType="image/gif"/>"#);

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), content_type::PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), content_type::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), content_type::SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml".to_string(), content_type::THEME),
        ("/docProps/core.xml".to_string(), content_type::CORE_PROPS),
        ("/docProps/app.xml".to_string(), content_type::APP_PROPS),
    ];
    for idx in 0..deck.slide_count() {
        overrides.push((format!("/ppt/slides/slide{}.xml", idx + 1), content_type::SLIDE));
    }
    for idx in 0..deck.charts().len() {
        overrides.push((format!("/{}", chart_part_name(idx)), content_type::CHART));
    }

    for (part, ct) in overrides {
        write!(xml, r#"<Override PartName="{}" ContentType="{}"/>"#, part, ct).map_err(fmt_err)?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

fn package_rels_xml() -> String {
    format!(
        concat!(
            "{}{}",
            r#"<Relationship Id="rId1" Type="{base}/officeDocument" Target="ppt/presentation.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="{base}/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECL,
        RELS_OPEN,
        base = REL_BASE
    )
}

fn core_props_xml(deck: &Deck) -> String {
    let props = deck.properties();
    format!(
        concat!(
            "{}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{}</dc:title><dc:creator>{}</dc:creator>",
            "</cp:coreProperties>"
        ),
        XML_DECL,
        xml_text(props.title.as_str()),
        xml_text(props.author.as_str())
    )
}

fn app_props_xml(deck: &Deck) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    write!(
        xml,
        "<Application>deckgen</Application><Slides>{}</Slides></Properties>",
        deck.slide_count()
    )
    .map_err(fmt_err)?;
    Ok(xml)
}

fn presentation_xml(deck: &Deck) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:presentation {}>"#, PML_NAMESPACES).map_err(fmt_err)?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if deck.slide_count() > 0 {
        xml.push_str("<p:sldIdLst>");
        for idx in 0..deck.slide_count() {
            write!(xml, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + idx, idx + 3).map_err(fmt_err)?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT
    )
    .map_err(fmt_err)?;
    xml.push_str("</p:presentation>");
    Ok(xml)
}

fn presentation_rels_xml(deck: &Deck) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(RELS_OPEN);
    write!(
        xml,
        r#"<Relationship Id="rId1" Type="{base}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{base}/theme" Target="theme/theme1.xml"/>"#,
        base = REL_BASE
    )
    .map_err(fmt_err)?;
    for idx in 0..deck.slide_count() {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            idx + 3,
            REL_BASE,
            idx + 1
        )
        .map_err(fmt_err)?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn slide_master_xml() -> String {
    format!(
        concat!(
            "{}<p:sldMaster {}>",
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{}</p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>",
            "</p:sldMaster>"
        ),
        XML_DECL, PML_NAMESPACES, EMPTY_SP_TREE
    )
}

fn slide_master_rels_xml() -> String {
    format!(
        concat!(
            "{}{}",
            r#"<Relationship Id="rId1" Type="{base}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
            r#"<Relationship Id="rId2" Type="{base}/theme" Target="../theme/theme1.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECL,
        RELS_OPEN,
        base = REL_BASE
    )
}

fn slide_layout_xml() -> String {
    format!(
        concat!(
            r#"{}<p:sldLayout {} type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank">{}</p:cSld>"#,
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
        ),
        XML_DECL, PML_NAMESPACES, EMPTY_SP_TREE
    )
}

fn slide_layout_rels_xml() -> String {
    format!(
        concat!(
            "{}{}",
            r#"<Relationship Id="rId1" Type="{base}/slideMaster" Target="../slideMasters/slideMaster1.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECL,
        RELS_OPEN,
        base = REL_BASE
    )
}

/// Theme part whose color and font schemes mirror the deck palette.
fn theme_xml() -> String {
    let clr = |tag: &str, c: Rgb| format!(r#"<a:{tag}><a:srgbClr val="{}"/></a:{tag}>"#, c.hex());
    let ph_fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = |w: u32| format!(r#"<a:ln w="{}">{}</a:ln>"#, w, ph_fill);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Deckgen">"#);
    xml.push_str(r#"<a:themeElements><a:clrScheme name="Deckgen">"#);
    xml.push_str(&clr("dk1", palette::INK));
    xml.push_str(&clr("lt1", palette::WHITE));
    xml.push_str(&clr("dk2", palette::MUTED));
    xml.push_str(&clr("lt2", palette::BG));
    xml.push_str(&clr("accent1", palette::PRIMARY));
    xml.push_str(&clr("accent2", palette::SECONDARY));
    xml.push_str(&clr("accent3", palette::ACCENT));
    xml.push_str(&clr("accent4", palette::INK));
    xml.push_str(&clr("accent5", palette::MUTED));
    xml.push_str(&clr("accent6", palette::CARD));
    xml.push_str(&clr("hlink", palette::PRIMARY));
    xml.push_str(&clr("folHlink", palette::MUTED));
    xml.push_str("</a:clrScheme>");

    xml.push_str(&format!(
        concat!(
            r#"<a:fontScheme name="Deckgen">"#,
            r#"<a:majorFont><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            "</a:fontScheme>"
        ),
        TextRole::Title.font().family,
        TextRole::Body.font().family
    ));

    xml.push_str(r#"<a:fmtScheme name="Deckgen"><a:fillStyleLst>"#);
    xml.push_str(&ph_fill.repeat(3));
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    xml.push_str(&line(6350));
    xml.push_str(&line(12700));
    xml.push_str(&line(19050));
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    xml.push_str(&effect.repeat(3));
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    xml.push_str(&ph_fill.repeat(3));
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme></a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}
