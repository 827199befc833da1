use std::sync::OnceLock;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use crate::models::{ParsedResult, Semester, Subject};

// Rows with fewer cells than this are never subject rows.
const MIN_ROW_CELLS: usize = 4;

/// Role a result table column plays, guessed from its header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Code,
    Name,
    Internal,
    External,
    Total,
    Unknown,
}

impl ColumnRole {
    // First rule that matches decides the role.
    pub fn classify(header: &str) -> Self {
        let header = header.to_lowercase();
        let has = |needle: &str| header.contains(needle);

        if has("code") || (has("sub") && has("no")) {
            ColumnRole::Code
        } else if has("subject") && has("name") {
            ColumnRole::Name
        } else if has("internal") || has("int") || has("mid") {
            ColumnRole::Internal
        } else if has("external") || has("ext") || has("end") {
            ColumnRole::External
        } else if has("total") || has("grand") {
            ColumnRole::Total
        } else {
            ColumnRole::Unknown
        }
    }
}

/// Column index for each role, taken from a header row. The first column claiming a role keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub code: Option<usize>,
    pub name: Option<usize>,
    pub internal: Option<usize>,
    pub external: Option<usize>,
    pub total: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = ColumnMap::default();
        for (index, header) in headers.iter().enumerate() {
            let slot = match ColumnRole::classify(header.as_ref()) {
                ColumnRole::Code => &mut map.code,
                ColumnRole::Name => &mut map.name,
                ColumnRole::Internal => &mut map.internal,
                ColumnRole::External => &mut map.external,
                ColumnRole::Total => &mut map.total,
                ColumnRole::Unknown => continue,
            };
            slot.get_or_insert(index);
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        *self == ColumnMap::default()
    }
}

/// What one strategy could read out of a row. Later strategies only fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub code: Option<String>,
    pub name: Option<String>,
    pub internal: Option<u32>,
    pub external: Option<u32>,
    pub total: Option<u32>,
}

impl RowFields {
    fn fill_from(&mut self, other: RowFields) {
        self.code = self.code.take().or(other.code);
        self.name = self.name.take().or(other.name);
        self.internal = self.internal.take().or(other.internal);
        self.external = self.external.take().or(other.external);
        self.total = self.total.take().filter(|t| *t > 0).or(other.total);
    }

    fn has_code_and_name(&self) -> bool {
        self.code.is_some() && self.name.is_some()
    }

    // A positive total, reported directly or summed from the component marks.
    fn resolved_total(&self) -> Option<u32> {
        self.total.filter(|t| *t > 0).or_else(|| {
            let sum = self.internal.unwrap_or(0).checked_add(self.external.unwrap_or(0))?;
            (sum > 0).then_some(sum)
        })
    }

    fn into_subject(self) -> Option<Subject> {
        let total = self.resolved_total()?;
        let code = self.code?;
        Some(Subject {
            code,
            name: self.name.unwrap_or_default(),
            internal: self.internal.unwrap_or(0),
            external: self.external.unwrap_or(0),
            total,
        })
    }
}

/// One way of reading a subject row.
pub trait RowStrategy {
    fn read(&self, cells: &[String]) -> RowFields;
}

/// Reads cells at the indices a header row gave us.
pub struct HeaderColumns<'a>(pub &'a ColumnMap);

impl RowStrategy for HeaderColumns<'_> {
    fn read(&self, cells: &[String]) -> RowFields {
        let text = |index: Option<usize>| index.and_then(|i| cells.get(i)).map(|c| c.trim());
        let marks = |index: Option<usize>| text(index).map(leading_number);

        RowFields {
            code: text(self.0.code).filter(|c| has_letter(c)).map(str::to_string),
            name: text(self.0.name).filter(|n| !n.is_empty()).map(str::to_string),
            internal: marks(self.0.internal),
            external: marks(self.0.external),
            total: marks(self.0.total),
        }
    }
}

/// Finds the cell shaped like a subject code, takes the next cell as the name and
/// the numeric cells after that as marks.
pub struct CodePattern;

impl RowStrategy for CodePattern {
    fn read(&self, cells: &[String]) -> RowFields {
        let Some(position) = cells.iter().position(|c| looks_like_code(c)) else {
            return RowFields::default();
        };
        let name = cells.get(position + 1).map(|n| n.trim()).filter(|n| !n.is_empty());

        let numbers: Vec<u32> = cells
            .iter()
            .skip(position + 2)
            .filter_map(|c| c.trim().parse::<u32>().ok())
            .collect();
        let (internal, external, total) = match numbers.as_slice() {
            [] => (None, None, None),
            [total] => (None, None, Some(*total)),
            [internal, external] => (Some(*internal), Some(*external), None),
            [internal, external, total, ..] => (Some(*internal), Some(*external), Some(*total)),
        };

        RowFields {
            code: Some(cells[position].trim().to_string()),
            name: name.map(str::to_string),
            internal,
            external,
            total,
        }
    }
}

/// Reads a row with the header columns first and falls back to the code pattern
/// for anything still missing. Returns `None` for rows that are not subjects.
pub fn read_subject(cells: &[String], columns: Option<&ColumnMap>) -> Option<Subject> {
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let mut fields = columns.map(|c| HeaderColumns(c).read(cells)).unwrap_or_default();
    if !fields.has_code_and_name() || fields.resolved_total().is_none() {
        let fallback = CodePattern.read(cells);
        // Name sits right after the code, so a relocated code brings its name along.
        if fields.code.is_none() && fallback.code.is_some() && fallback.name.is_some() {
            fields.name = None;
        }
        fields.fill_from(fallback);
    }
    fields.into_subject()
}

/// Pulls student identity and every semester table out of a result page.
///
/// Never fails: an unreadable page gives empty identity fields and no semesters.
pub fn extract(html: &str) -> ParsedResult {
    let document = Html::parse_document(html);

    let mut result = ParsedResult {
        student_name: find_labelled_value(&document, student_name_label()),
        enrollment_no: find_labelled_value(&document, enrollment_label()),
        programme: find_labelled_value(&document, programme_label()),
        semesters: Vec::new(),
    };

    for (index, table) in document.select(selector(&TABLE, "table")).enumerate() {
        let subjects = read_table(table);
        if subjects.is_empty() {
            debug!("Table {} has no subject rows, skipping", index + 1);
            continue;
        }
        result.semesters.push(Semester {
            semester: result.semesters.len() as u32 + 1,
            subjects,
        });
    }

    debug!(
        "Extracted {} semesters for {:?}",
        result.semesters.len(),
        result.enrollment_no
    );
    result
}

fn read_table(table: ElementRef) -> Vec<Subject> {
    let rows: Vec<Vec<ElementRef>> = table
        .select(selector(&ROW, "tr"))
        .filter(|row| belongs_to(*row, table))
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let columns = if is_header_row(first) {
        let headers: Vec<String> = first.iter().map(|c| cell_text(*c)).collect();
        Some(ColumnMap::from_headers(&headers))
    } else {
        None
    };
    let data_rows = if columns.is_some() { &rows[1..] } else { &rows[..] };

    data_rows
        .iter()
        .filter_map(|row| {
            let cells: Vec<String> = row.iter().map(|c| cell_text(*c)).collect();
            let subject = read_subject(&cells, columns.as_ref());
            if subject.is_none() {
                debug!("Rejected row {:?}", cells);
            }
            subject
        })
        .collect()
}

fn is_header_row(cells: &[ElementRef]) -> bool {
    if cells.iter().all(|c| c.value().name() == "th") {
        return true;
    }
    let texts: Vec<String> = cells.iter().map(|c| cell_text(*c)).collect();
    texts.iter().any(|t| ColumnRole::classify(t) != ColumnRole::Unknown)
        && !texts.iter().any(|t| looks_like_code(t))
}

fn row_cells(row: ElementRef) -> Vec<ElementRef> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
        .collect()
}

// Nested tables own their own rows.
fn belongs_to(row: ElementRef, table: ElementRef) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
        .is_some_and(|owner| owner.id() == table.id())
}

// Looks for a label element and returns the text next to it. First match wins.
fn find_labelled_value(document: &Html, label: &Regex) -> String {
    for element in document.select(selector(&LABEL, "td, th, span, div, label, p, b, strong, font, li")) {
        let text = cell_text(element);
        if !label.is_match(&text) {
            continue;
        }
        // Let the innermost element carrying the label answer.
        let inner_label = element
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| label.is_match(&cell_text(child)));
        if inner_label {
            continue;
        }

        let value = text_after_label(&text, label)
            .or_else(|| next_sibling_text(element))
            .or_else(|| wrapper_sibling_text(element))
            .or_else(|| enclosing_text_after_label(element, label))
            .unwrap_or_default();
        if !value.is_empty() {
            return value;
        }
    }
    String::new()
}

// "Student Name: VIJAY KUMAR" gives "VIJAY KUMAR".
fn text_after_label(text: &str, label: &Regex) -> Option<String> {
    let found = label.find(text)?;
    let rest = text[found.end()..].trim_start_matches(|c: char| c == ':' || c == '.' || c.is_whitespace());
    Some(rest.to_string()).filter(|v| !v.is_empty())
}

fn next_sibling_text(element: ElementRef) -> Option<String> {
    let sibling = element.next_siblings().find_map(ElementRef::wrap)?;
    Some(cell_text(sibling)).filter(|v| !v.is_empty())
}

// Climbs through ancestors that hold nothing but the label (e.g. `<td><b>Label</b></td>`).
fn wrapper_sibling_text(element: ElementRef) -> Option<String> {
    let label = cell_text(element);
    let mut current = element;
    loop {
        let parent = current.parent().and_then(ElementRef::wrap)?;
        if cell_text(parent) != label {
            return None;
        }
        if parent.next_siblings().find_map(ElementRef::wrap).is_some() {
            return next_sibling_text(parent);
        }
        current = parent;
    }
}

// For `<td><b>Label:</b> value</td>`: the first ancestor holding more than the label carries the value.
fn enclosing_text_after_label(element: ElementRef, label: &Regex) -> Option<String> {
    let own = cell_text(element);
    let enclosing = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(cell_text)
        .find(|text| *text != own)?;
    text_after_label(&enclosing, label)
}

fn cell_text(element: ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn looks_like_code(text: &str) -> bool {
    code_pattern().is_match(text.trim())
}

fn has_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

// Leading digits of a marks cell: "67*" is 67, "AB" is 0.
pub(crate) fn leading_number(text: &str) -> u32 {
    let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

static TABLE: OnceLock<Selector> = OnceLock::new();
static ROW: OnceLock<Selector> = OnceLock::new();
static LABEL: OnceLock<Selector> = OnceLock::new();

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).unwrap())
}

fn code_pattern() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"(?i)^[a-z]{2,4}-?\d{3}$").unwrap())
}

fn student_name_label() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"(?i)student\s*name").unwrap())
}

fn enrollment_label() -> &'static Regex {
    static ENROLMENT: OnceLock<Regex> = OnceLock::new();
    ENROLMENT.get_or_init(|| Regex::new(r"(?i)enroll?ment\s*no").unwrap())
}

fn programme_label() -> &'static Regex {
    static PROGRAMME: OnceLock<Regex> = OnceLock::new();
    PROGRAMME.get_or_init(|| Regex::new(r"(?i)programme").unwrap())
}
