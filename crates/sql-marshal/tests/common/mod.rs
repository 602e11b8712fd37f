//! Shared mock backend for integration tests.
//!
//! `ScriptedCursor` plays back a row of typed cells, `RecordingStatement`
//! captures every bind, and `EchoRuntime` stands in for the embedding
//! runtime. Together they let the tests drive the whole layer without a
//! real database.

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use sql_marshal::{
    Close, DynStr, DynValue, MarshalError, ParamStatement, ResultCursor, RuntimeAdapter,
    SqlFailure, SqlResult, SqlType,
};

/// One scripted result cell.
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    I64(i64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
    Time(NaiveTime),
    Str(String),
    Binary(Vec<u8>),
}

/// Cursor playing back one scripted row. Columns are 1-based.
pub struct ScriptedCursor {
    cells: Vec<(SqlType, Cell)>,
    pub closes: u32,
}

impl ScriptedCursor {
    pub fn new(cells: Vec<(SqlType, Cell)>) -> Self {
        Self { cells, closes: 0 }
    }

    fn cell(&self, col: usize) -> SqlResult<&(SqlType, Cell)> {
        self.cells
            .get(col - 1)
            .ok_or_else(|| SqlFailure::new(0, "07009", format!("no column {}", col)))
    }
}

impl Close for ScriptedCursor {
    fn close(&mut self) -> SqlResult<()> {
        self.closes += 1;
        Ok(())
    }
}

impl ResultCursor for ScriptedCursor {
    fn get_i64(&mut self, col: usize) -> SqlResult<Option<i64>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::I64(v) => Ok(Some(*v)),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn get_decimal(&mut self, col: usize) -> SqlResult<Option<Decimal>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Decimal(v) => Ok(Some(*v)),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn get_bool(&mut self, col: usize) -> SqlResult<Option<bool>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Bool(v) => Ok(Some(*v)),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn get_date(&mut self, col: usize) -> SqlResult<Option<NaiveDate>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Date(v) => Ok(Some(*v)),
            Cell::Timestamp(v) => Ok(Some(v.date_naive())),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn get_timestamp(&mut self, col: usize) -> SqlResult<Option<DateTime<FixedOffset>>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Timestamp(v) => Ok(Some(*v)),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn get_time(&mut self, col: usize) -> SqlResult<Option<NaiveTime>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Time(v) => Ok(Some(*v)),
            Cell::Timestamp(v) => Ok(Some(v.time())),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn get_string(&mut self, col: usize) -> SqlResult<Option<String>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Str(v) => Ok(Some(v.clone())),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn binary_stream(&mut self, col: usize) -> SqlResult<Option<Box<dyn Read + '_>>> {
        match &self.cell(col)?.1 {
            Cell::Null => Ok(None),
            Cell::Binary(v) => Ok(Some(
                Box::new(std::io::Cursor::new(v.clone())) as Box<dyn Read>
            )),
            other => Err(type_mismatch(col, other)),
        }
    }

    fn column_sql_type(&self, col: usize) -> SqlResult<SqlType> {
        Ok(self.cell(col)?.0)
    }
}

fn type_mismatch(col: usize, cell: &Cell) -> SqlFailure {
    SqlFailure::new(0, "07006", format!("column {} holds {:?}", col, cell))
}

/// One captured bind.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundParam {
    I32(usize, i32),
    I64(usize, i64),
    F64(usize, f64),
    Decimal(usize, Decimal),
    Bool(usize, bool),
    Str(usize, String),
    Bytes(usize, Vec<u8>),
    Date(usize, NaiveDate),
    Time(usize, NaiveTime),
    Timestamp(usize, NaiveDateTime),
    Instant(usize, i64, FixedOffset),
    Null(usize, SqlType),
    I32As(usize, i32, SqlType),
}

/// Statement capturing every bind it receives.
#[derive(Default)]
pub struct RecordingStatement {
    pub bound: Vec<BoundParam>,
    pub param_type: Option<SqlType>,
    pub column_type: Option<SqlType>,
    pub closes: u32,
    pub fail_close: bool,
}

impl Close for RecordingStatement {
    fn close(&mut self) -> SqlResult<()> {
        self.closes += 1;
        if self.fail_close {
            Err(SqlFailure::new(0, "08003", "already torn down"))
        } else {
            Ok(())
        }
    }
}

impl ParamStatement for RecordingStatement {
    fn bind_i32(&mut self, idx: usize, value: i32) -> SqlResult<()> {
        self.bound.push(BoundParam::I32(idx, value));
        Ok(())
    }

    fn bind_i64(&mut self, idx: usize, value: i64) -> SqlResult<()> {
        self.bound.push(BoundParam::I64(idx, value));
        Ok(())
    }

    fn bind_f64(&mut self, idx: usize, value: f64) -> SqlResult<()> {
        self.bound.push(BoundParam::F64(idx, value));
        Ok(())
    }

    fn bind_decimal(&mut self, idx: usize, value: Decimal) -> SqlResult<()> {
        self.bound.push(BoundParam::Decimal(idx, value));
        Ok(())
    }

    fn bind_bool(&mut self, idx: usize, value: bool) -> SqlResult<()> {
        self.bound.push(BoundParam::Bool(idx, value));
        Ok(())
    }

    fn bind_string(&mut self, idx: usize, value: &str) -> SqlResult<()> {
        self.bound.push(BoundParam::Str(idx, value.to_string()));
        Ok(())
    }

    fn bind_bytes(&mut self, idx: usize, value: &[u8]) -> SqlResult<()> {
        self.bound.push(BoundParam::Bytes(idx, value.to_vec()));
        Ok(())
    }

    fn bind_date(&mut self, idx: usize, value: NaiveDate) -> SqlResult<()> {
        self.bound.push(BoundParam::Date(idx, value));
        Ok(())
    }

    fn bind_time(&mut self, idx: usize, value: NaiveTime) -> SqlResult<()> {
        self.bound.push(BoundParam::Time(idx, value));
        Ok(())
    }

    fn bind_timestamp(&mut self, idx: usize, value: NaiveDateTime) -> SqlResult<()> {
        self.bound.push(BoundParam::Timestamp(idx, value));
        Ok(())
    }

    fn bind_instant(
        &mut self,
        idx: usize,
        epoch_millis: i64,
        offset: FixedOffset,
    ) -> SqlResult<()> {
        self.bound
            .push(BoundParam::Instant(idx, epoch_millis, offset));
        Ok(())
    }

    fn bind_null(&mut self, idx: usize, sql_type: SqlType) -> SqlResult<()> {
        self.bound.push(BoundParam::Null(idx, sql_type));
        Ok(())
    }

    fn bind_i32_as(&mut self, idx: usize, value: i32, sql_type: SqlType) -> SqlResult<()> {
        self.bound.push(BoundParam::I32As(idx, value, sql_type));
        Ok(())
    }

    fn parameter_sql_type(&self, _idx: usize) -> SqlResult<SqlType> {
        self.param_type
            .ok_or_else(|| SqlFailure::new(0, "HY000", "no parameter metadata"))
    }

    fn result_column_sql_type(&self, _idx: usize) -> SqlResult<SqlType> {
        self.column_type
            .ok_or_else(|| SqlFailure::new(0, "HY000", "no result metadata"))
    }
}

/// Embedding-runtime stand-in: constants resolve to class references,
/// serialized objects are UTF-8 text.
#[derive(Default)]
pub struct EchoRuntime;

impl RuntimeAdapter for EchoRuntime {
    fn resolve_constant(&self, name: &DynStr) -> Result<DynValue, MarshalError> {
        Ok(DynValue::ClassRef(name.value.clone()))
    }

    fn deserialize_object(&self, bytes: &[u8]) -> Result<DynValue, MarshalError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(DynValue::text(text)),
            Err(_) => Err(MarshalError::runtime("not a marshalled value")),
        }
    }
}
