//! Constants of the interchange layout shared by the decoder and the encoder.

/// Header of the row id column.
pub const ID_HEADER: &str = "id";
/// Header of the entity name column.
pub const NAME_HEADER: &str = "模型名";
/// Header of the persisted hidden flag column.
pub const HIDDEN_HEADER: &str = "隐藏";
/// Header of the show-beside-column-header flag column.
pub const SHOW_BESIDE_HEADER_HEADER: &str = "显示在列名旁";
/// Header of the entity-row marker column.
pub const IS_MODEL_HEADER: &str = "isModel";
/// Legacy header recognised on decode only.
pub const LEGACY_SHOW_BESIDE_ENTITY_HEADER: &str = "显示在模型旁";

/// Every header that never becomes a data column.
pub const RESERVED_HEADERS: [&str; 6] = [
    NAME_HEADER,
    ID_HEADER,
    IS_MODEL_HEADER,
    HIDDEN_HEADER,
    LEGACY_SHOW_BESIDE_ENTITY_HEADER,
    SHOW_BESIDE_HEADER_HEADER,
];

pub const YES: &str = "是";
pub const NO: &str = "否";

/// Info-field columns at or below this sort index are written before the
/// metric block, the rest after it.
pub const EARLY_INFO_FIELD_LIMIT: i64 = 5;

pub fn is_reserved_header(header: &str) -> bool {
    RESERVED_HEADERS.contains(&header)
}

/// Flag cell text for a boolean.
pub fn flag(value: bool) -> &'static str {
    if value { YES } else { NO }
}

/// True only for the exact affirmative marker.
pub fn is_yes(cell: &str) -> bool {
    cell.trim() == YES
}

pub fn is_early_info_field(sort_index: i64) -> bool {
    sort_index <= EARLY_INFO_FIELD_LIMIT
}

/// One of the six metadata rows that describe the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRow {
    IsMetric,
    Hidden,
    ShowBesideEntity,
    FullName,
    Notes,
    ColumnId,
}

impl ControlRow {
    pub const ALL: [ControlRow; 6] = [
        ControlRow::IsMetric,
        ControlRow::Hidden,
        ControlRow::ShowBesideEntity,
        ControlRow::FullName,
        ControlRow::Notes,
        ControlRow::ColumnId,
    ];

    /// Row id stored in the `id` column.
    pub fn id(self) -> u32 {
        match self {
            ControlRow::IsMetric => 1,
            ControlRow::Hidden => 2,
            ControlRow::ShowBesideEntity => 3,
            ControlRow::FullName => 4,
            ControlRow::Notes => 5,
            ControlRow::ColumnId => 6,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|row| row.id() == id)
    }

    /// Text written in the entity name column.
    pub fn label(self) -> &'static str {
        match self {
            ControlRow::IsMetric => "isDataset",
            ControlRow::Hidden => "隐藏",
            ControlRow::ShowBesideEntity => "显示在模型旁",
            ControlRow::FullName => "数据集全名",
            ControlRow::Notes => "备注",
            ControlRow::ColumnId => "id",
        }
    }

    /// Cells of the `隐藏`, `显示在列名旁` and `isModel` columns on this row.
    pub fn reserved_cells(self) -> ReservedCells {
        match self {
            ControlRow::IsMetric => ReservedCells::new(NO, "", NO),
            ControlRow::Hidden | ControlRow::ShowBesideEntity => ReservedCells::new(YES, "", NO),
            ControlRow::FullName | ControlRow::Notes => ReservedCells::new(YES, YES, NO),
            ControlRow::ColumnId => ReservedCells::new("1", "5", "4"),
        }
    }
}

/// Fixed cell texts of a control row under the reserved headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedCells {
    pub hidden: &'static str,
    pub show_beside_header: &'static str,
    pub is_model: &'static str,
}

impl ReservedCells {
    const fn new(
        hidden: &'static str,
        show_beside_header: &'static str,
        is_model: &'static str,
    ) -> Self {
        Self {
            hidden,
            show_beside_header,
            is_model,
        }
    }
}
