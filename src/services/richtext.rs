//! 富文本规范化 - 业务能力层
//!
//! 平台上所有题目内容都是受控 HTML: 只允许加粗/斜体/下划线和换行，
//! 其余标记一律剥离，script/style 连同内容整块丢弃。
//! 本模块把任意来源的 HTML 收敛到这个受控模型，
//! 长度校验一律按剥离后的纯文本字符数计算。

use crate::error::ValidationError;
use anyhow::Result;
use regex::Regex;

/// 题干长度下限(纯文本字符数)
pub const QUESTION_TEXT_MIN: usize = 10;
/// 题干长度上限
pub const QUESTION_TEXT_MAX: usize = 5000;
/// 选项长度下限
pub const ANSWER_TEXT_MIN: usize = 1;
/// 选项长度上限
pub const ANSWER_TEXT_MAX: usize = 2000;
/// 解析长度上限(允许为空)
pub const EXPLANATION_MAX: usize = 10000;

/// 带样式的文本片段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// 受控富文本: 有序的样式片段序列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    spans: Vec<StyledSpan>,
}

/// 规范化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRichText {
    /// 剥离全部标记后的纯文本
    pub plain_text: String,
    /// 纯文本字符数(按 Unicode 标量计，换行也算一个字符)
    pub length: usize,
    /// 重新序列化后的受控 HTML
    pub sanitized_html: String,
}

impl RichText {
    /// 解析任意 HTML 为受控片段序列
    ///
    /// 未知标签剥离但保留其中文本；script/style 整块丢弃；
    /// 多余的闭合标签忽略；未闭合的 `<` 按普通字符处理。
    pub fn parse(raw: &str) -> Self {
        let chars: Vec<char> = raw.chars().collect();
        let mut spans: Vec<StyledSpan> = Vec::new();
        let mut buffer = String::new();
        let mut bold: u32 = 0;
        let mut italic: u32 = 0;
        let mut underline: u32 = 0;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '<' {
                let Some(end) = find_char(&chars, i + 1, '>') else {
                    buffer.extend(chars[i..].iter());
                    break;
                };
                let tag_raw: String = chars[i + 1..end].iter().collect();
                let tag = parse_tag(&tag_raw);
                i = end + 1;

                match tag.name.as_str() {
                    "b" | "strong" => {
                        push_text(&mut spans, &mut buffer, bold, italic, underline);
                        apply_depth(&mut bold, &tag);
                    }
                    "i" | "em" => {
                        push_text(&mut spans, &mut buffer, bold, italic, underline);
                        apply_depth(&mut italic, &tag);
                    }
                    "u" => {
                        push_text(&mut spans, &mut buffer, bold, italic, underline);
                        apply_depth(&mut underline, &tag);
                    }
                    "br" => {
                        if !tag.closing {
                            buffer.push('\n');
                        }
                    }
                    "p" | "div" => {
                        if tag.closing {
                            buffer.push('\n');
                        }
                    }
                    "script" | "style" => {
                        if !tag.closing && !tag.self_closing {
                            i = skip_block(&chars, i, &tag.name);
                        }
                    }
                    _ => {}
                }
            } else if c == '&' {
                let semi = (i + 1..(i + 10).min(chars.len())).find(|&k| chars[k] == ';');
                match semi {
                    Some(semi) => {
                        let entity: String = chars[i + 1..semi].iter().collect();
                        match decode_entity(&entity) {
                            Some(decoded) => {
                                buffer.push(decoded);
                                i = semi + 1;
                            }
                            None => {
                                buffer.push('&');
                                i += 1;
                            }
                        }
                    }
                    None => {
                        buffer.push('&');
                        i += 1;
                    }
                }
            } else {
                buffer.push(c);
                i += 1;
            }
        }

        push_text(&mut spans, &mut buffer, bold, italic, underline);

        // 去掉块级标签在末尾留下的换行
        while let Some(last) = spans.last_mut() {
            while last.text.ends_with('\n') {
                last.text.pop();
            }
            if last.text.is_empty() {
                spans.pop();
            } else {
                break;
            }
        }

        Self { spans }
    }

    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// 纯文本(按片段顺序拼接)
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// 纯文本字符数
    pub fn char_len(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    /// 重新序列化为受控 HTML
    ///
    /// 文本内容做转义，样式标签按 b > i > u 固定嵌套顺序输出
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for span in &self.spans {
            let mut open = String::new();
            let mut close = String::new();
            if span.bold {
                open.push_str("<b>");
                close.insert_str(0, "</b>");
            }
            if span.italic {
                open.push_str("<i>");
                close.insert_str(0, "</i>");
            }
            if span.underline {
                open.push_str("<u>");
                close.insert_str(0, "</u>");
            }
            html.push_str(&open);
            html.push_str(&escape_html(&span.text).replace('\n', "<br>"));
            html.push_str(&close);
        }
        html
    }
}

/// 规范化任意 HTML
pub fn normalize(raw: &str) -> NormalizedRichText {
    let rich = RichText::parse(raw);
    NormalizedRichText {
        plain_text: rich.plain_text(),
        length: rich.char_len(),
        sanitized_html: rich.to_html(),
    }
}

/// 规范化并校验长度，返回规范化结果供直接上送
pub fn check_length(
    raw: &str,
    field: &str,
    min: usize,
    max: usize,
) -> Result<NormalizedRichText, ValidationError> {
    let normalized = normalize(raw);
    if normalized.length < min {
        return Err(ValidationError::too_short(field, normalized.length, min));
    }
    if normalized.length > max {
        return Err(ValidationError::too_long(field, normalized.length, max));
    }
    Ok(normalized)
}

/// 从 HTML 里提取所有图片地址
pub fn extract_image_urls(html: &str) -> Result<Vec<String>> {
    let img_regex = Regex::new(r#"<img\s+[^>]*src="([^"]+)""#)?;
    let urls = img_regex
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect();
    Ok(urls)
}

// ========== 解析辅助 ==========

struct ParsedTag {
    name: String,
    closing: bool,
    self_closing: bool,
}

fn parse_tag(raw: &str) -> ParsedTag {
    let trimmed = raw.trim();
    let closing = trimmed.starts_with('/');
    let self_closing = trimmed.ends_with('/') && !closing;
    let rest = trimmed.trim_start_matches('/');
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    ParsedTag {
        name,
        closing,
        self_closing,
    }
}

fn find_char(chars: &[char], from: usize, target: char) -> Option<usize> {
    (from..chars.len()).find(|&k| chars[k] == target)
}

/// 跳过 script/style 块，返回闭合标签之后的位置
fn skip_block(chars: &[char], from: usize, name: &str) -> usize {
    let closing: Vec<char> = format!("</{}", name).chars().collect();
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '<' && matches_ignore_case(chars, i, &closing) {
            if let Some(end) = find_char(chars, i, '>') {
                return end + 1;
            }
            return chars.len();
        }
        i += 1;
    }
    chars.len()
}

fn matches_ignore_case(chars: &[char], at: usize, pattern: &[char]) -> bool {
    if at + pattern.len() > chars.len() {
        return false;
    }
    pattern
        .iter()
        .enumerate()
        .all(|(k, p)| chars[at + k].eq_ignore_ascii_case(p))
}

/// 闭合标签减层、开启标签加层，多余的闭合标签停在 0 层
fn apply_depth(depth: &mut u32, tag: &ParsedTag) {
    if tag.closing {
        *depth = depth.saturating_sub(1);
    } else if !tag.self_closing {
        *depth += 1;
    }
}

/// 把积累的文本按当前样式收进片段序列，相邻同样式片段自动合并
fn push_text(spans: &mut Vec<StyledSpan>, buffer: &mut String, bold: u32, italic: u32, underline: u32) {
    if buffer.is_empty() {
        return;
    }
    let (bold, italic, underline) = (bold > 0, italic > 0, underline > 0);
    if let Some(last) = spans.last_mut() {
        if last.bold == bold && last.italic == italic && last.underline == underline {
            last.text.push_str(buffer);
            buffer.clear();
            return;
        }
    }
    spans.push(StyledSpan {
        text: std::mem::take(buffer),
        bold,
        italic,
        underline,
    });
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_dropped_with_content() {
        let normalized = normalize("<script>x</script><b>hi</b>");
        assert_eq!(normalized.plain_text, "hi");
        assert_eq!(normalized.length, 2);
        assert_eq!(normalized.sanitized_html, "<b>hi</b>");
    }

    #[test]
    fn test_plain_text_passthrough() {
        let normalized = normalize("心脏有四个瓣膜");
        assert_eq!(normalized.plain_text, "心脏有四个瓣膜");
        assert_eq!(normalized.length, 7);
        assert_eq!(normalized.sanitized_html, "心脏有四个瓣膜");
    }

    #[test]
    fn test_unknown_tags_stripped_text_kept() {
        let normalized = normalize(r##"<span class="hl">股骨</span>属于<a href="#">长骨</a>"##);
        assert_eq!(normalized.plain_text, "股骨属于长骨");
        assert_eq!(normalized.sanitized_html, "股骨属于长骨");
    }

    #[test]
    fn test_allowed_styles_survive() {
        let normalized = normalize("<b>加粗</b>普通<i>斜体</i><u>下划线</u>");
        assert_eq!(normalized.plain_text, "加粗普通斜体下划线");
        assert_eq!(
            normalized.sanitized_html,
            "<b>加粗</b>普通<i>斜体</i><u>下划线</u>"
        );
    }

    #[test]
    fn test_strong_em_mapped() {
        let normalized = normalize("<strong>重点</strong><em>强调</em>");
        assert_eq!(normalized.sanitized_html, "<b>重点</b><i>强调</i>");
    }

    #[test]
    fn test_nested_same_style_merges() {
        let normalized = normalize("<b><b>深</b>层</b>");
        assert_eq!(normalized.plain_text, "深层");
        assert_eq!(normalized.sanitized_html, "<b>深层</b>");
    }

    #[test]
    fn test_mixed_nesting_order_fixed() {
        // 输出按 b > i 固定嵌套，与输入的嵌套写法无关
        let normalized = normalize("<i><b>先斜后粗</b></i>");
        assert_eq!(normalized.sanitized_html, "<b><i>先斜后粗</i></b>");
    }

    #[test]
    fn test_entities_decoded_then_reescaped() {
        let normalized = normalize("pH &lt; 7 &amp; pH &gt; 5");
        assert_eq!(normalized.plain_text, "pH < 7 & pH > 5");
        assert_eq!(normalized.sanitized_html, "pH &lt; 7 &amp; pH &gt; 5");
    }

    #[test]
    fn test_numeric_entities() {
        let normalized = normalize("&#39;引号&#x41;");
        assert_eq!(normalized.plain_text, "'引号A");
    }

    #[test]
    fn test_bare_ampersand_kept() {
        let normalized = normalize("A & B");
        assert_eq!(normalized.plain_text, "A & B");
        assert_eq!(normalized.sanitized_html, "A &amp; B");
    }

    #[test]
    fn test_br_and_paragraph_newlines() {
        let normalized = normalize("第一行<br>第二行");
        assert_eq!(normalized.plain_text, "第一行\n第二行");
        assert_eq!(normalized.length, 7);
        assert_eq!(normalized.sanitized_html, "第一行<br>第二行");

        let normalized = normalize("<p>甲</p><p>乙</p>");
        assert_eq!(normalized.plain_text, "甲\n乙");
        assert_eq!(normalized.sanitized_html, "甲<br>乙");
    }

    #[test]
    fn test_stray_closing_tag_ignored() {
        let normalized = normalize("</b>没加粗<b>加粗</b>");
        assert_eq!(normalized.sanitized_html, "没加粗<b>加粗</b>");
    }

    #[test]
    fn test_unterminated_angle_is_text() {
        let normalized = normalize("温度 <37");
        assert_eq!(normalized.plain_text, "温度 <37");
        assert_eq!(normalized.sanitized_html, "温度 &lt;37");
    }

    #[test]
    fn test_attributes_and_case_ignored() {
        let normalized = normalize(r#"<B style="color:red">红色</B>"#);
        assert_eq!(normalized.sanitized_html, "<b>红色</b>");

        let normalized = normalize("<SCRIPT type=\"text/javascript\">alert(1)</SCRIPT>之后");
        assert_eq!(normalized.plain_text, "之后");
    }

    #[test]
    fn test_style_block_dropped() {
        let normalized = normalize("<style>.x{color:red}</style>正文");
        assert_eq!(normalized.plain_text, "正文");
    }

    #[test]
    fn test_unclosed_script_drops_rest() {
        let normalized = normalize("前<script>var x = 1;");
        assert_eq!(normalized.plain_text, "前");
    }

    #[test]
    fn test_empty_input() {
        let normalized = normalize("");
        assert_eq!(normalized.length, 0);
        assert_eq!(normalized.sanitized_html, "");
    }

    #[test]
    fn test_length_counts_plain_chars_only() {
        let normalized = normalize("<b><i><u>hi</u></i></b>");
        assert_eq!(normalized.length, 2);
    }

    #[test]
    fn test_check_length_bounds() {
        // 下限取不到
        let err = check_length("<b>短</b>", "题干", 10, 5000).expect_err("应判过短");
        assert_eq!(err.field, "题干");
        assert!(err.reason.contains("小于"));

        // 正好在边界上
        let ok = check_length("十个字符的题干内容。", "题干", 10, 5000).expect("应通过");
        assert_eq!(ok.length, 10);

        // 超过上限
        let long_text = "字".repeat(2001);
        let err = check_length(&long_text, "选项", 1, 2000).expect_err("应判过长");
        assert!(err.reason.contains("超过"));
    }

    #[test]
    fn test_extract_image_urls() {
        let html = r#"<p>见图</p><img class="q" src="https://cdn.example.com/a.png"><img src="https://cdn.example.com/b.png">"#;
        let urls = extract_image_urls(html).expect("正则应编译通过");
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/a.png".to_string(),
                "https://cdn.example.com/b.png".to_string()
            ]
        );
    }

    #[test]
    fn test_no_image_urls() {
        let urls = extract_image_urls("<b>纯文字</b>").expect("正则应编译通过");
        assert!(urls.is_empty());
    }
}
