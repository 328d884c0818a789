//! SIにおける日付時刻。
//!
//! 日付は修正ユリウス日（MJD）、時刻はUTCの二進化十進数で伝送される。

use std::fmt::{self, Write};

use crate::utils::{read_bcd_digit, BytesExt};

fn write_2digits<W: Write>(w: &mut W, n: u8) -> fmt::Result {
    w.write_char((b'0' + n / 10 % 10) as char)?;
    w.write_char((b'0' + n % 10) as char)
}

/// 修正ユリウス日。
#[derive(Clone, PartialEq, Eq)]
pub struct MjdDate {
    /// 1900年からの年（1993年＝93）。
    pub year: u16,
    /// 月（1月＝1、12月＝12）。
    pub month: u8,
    /// 日（1～31）。
    pub day: u8,
    /// 曜日（月曜日＝1、日曜日＝7）。
    pub day_of_week: u8,
}

impl MjdDate {
    /// 16ビットの修正ユリウス日から`MjdDate`を生成する。
    ///
    /// 換算式はEN 300 468 付属書Cに従う。
    pub fn from_mjd(mjd: u16) -> MjdDate {
        let mjd_f = mjd as f64;
        let yp = ((mjd_f - 15078.2) / 365.25).max(0.) as i32;
        let yp_days = (yp as f64 * 365.25) as i32;
        let mp = ((mjd_f - 14956.1 - yp_days as f64) / 30.6001).max(0.) as i32;
        let day = mjd as i32 - 14956 - yp_days - (mp as f64 * 30.6001) as i32;
        let k = i32::from(mp == 14 || mp == 15);

        MjdDate {
            year: (yp + k).clamp(0, u16::MAX as i32) as u16,
            month: (mp - 1 - k * 12).clamp(0, 12) as u8,
            day: day.clamp(0, 31) as u8,
            day_of_week: ((mjd as u32 + 2) % 7 + 1) as u8,
        }
    }

    /// `data`から`MjdDate`を読み取る。
    #[inline]
    pub fn read(data: &[u8; 2]) -> MjdDate {
        MjdDate::from_mjd(data.read_be_16())
    }
}

impl fmt::Debug for MjdDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", 1900 + self.year as u32)?;

        f.write_char('-')?;
        write_2digits(f, self.month)?;

        f.write_char('-')?;
        write_2digits(f, self.day)
    }
}

impl fmt::Display for MjdDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 修正ユリウス日とUTCからなる日付時刻。
#[derive(Clone, PartialEq, Eq)]
pub struct DateTime {
    /// 修正ユリウス日。
    pub date: MjdDate,
    /// 時（0～23）。
    pub hour: u8,
    /// 分（0～59）。
    pub minute: u8,
    /// 秒（0～60）。
    pub second: u8,
}

impl DateTime {
    /// `data`から`DateTime`を読み取る。
    pub fn read(data: &[u8; 5]) -> DateTime {
        let date = MjdDate::from_mjd(data[0..=1].read_be_16());

        DateTime {
            date,
            hour: read_bcd_digit(data[2]),
            minute: read_bcd_digit(data[3]),
            second: read_bcd_digit(data[4]),
        }
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.date, f)?;
        f.write_char(' ')?;

        write_2digits(f, self.hour)?;
        f.write_char(':')?;
        write_2digits(f, self.minute)?;
        f.write_char(':')?;
        write_2digits(f, self.second)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 二進化十進数の`hhmm`で表される時間差。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOffset {
    /// 時（0～99）。
    pub hours: u8,
    /// 分（0～59）。
    pub minutes: u8,
}

impl TimeOffset {
    /// `data`から`TimeOffset`を読み取る。
    #[inline]
    pub fn read(data: &[u8; 2]) -> TimeOffset {
        TimeOffset {
            hours: read_bcd_digit(data[0]),
            minutes: read_bcd_digit(data[1]),
        }
    }

    /// 時間差を分で返す。
    #[inline]
    pub fn as_minutes(&self) -> i32 {
        self.hours as i32 * 60 + self.minutes as i32
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_2digits(f, self.hours)?;
        f.write_char(':')?;
        write_2digits(f, self.minutes)
    }
}
