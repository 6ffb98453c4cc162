use anyhow::anyhow;
use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};
use regex::Regex;

pub const DUE_DATE_FORMAT: &str =
  "%Y-%m-%d";

/// Parses a due date typed by a user.
///
/// Returns `Ok(None)` for an empty
/// input or `none`, which clears the
/// due date.
#[tracing::instrument]
pub fn parse_due_expr(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<Option<NaiveDate>> {
  let raw =
    input.trim().to_ascii_lowercase();

  match raw.as_str() {
    | "" | "none" => return Ok(None),
    | "today" => return Ok(Some(today)),
    | "tomorrow" => {
      return Ok(today.succ_opt());
    }
    | "yesterday" => {
      return Ok(today.pred_opt());
    }
    | _ => {}
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      &raw,
      DUE_DATE_FORMAT
    )
  {
    return Ok(Some(date));
  }

  let rel_re = Regex::new(r"^\+(?P<num>\d+)(?P<unit>[dw])$")
        .map_err(|e| anyhow!("internal regex compile failure: {e}"))?;

  if let Some(caps) =
    rel_re.captures(&raw)
  {
    let num: i64 = caps["num"]
      .parse()
      .map_err(|e| {
        anyhow!(
          "invalid offset in due \
           date {input:?}: {e}"
        )
      })?;
    let days = match &caps["unit"] {
      | "w" => num.saturating_mul(7),
      | _ => num
    };
    return Duration::try_days(days)
      .and_then(|offset| {
        today.checked_add_signed(offset)
      })
      .map(Some)
      .ok_or_else(|| {
        anyhow!(
          "due date out of range: \
           {input}"
        )
      });
  }

  if let Some(weekday) =
    parse_weekday(&raw)
  {
    return Ok(Some(next_weekday(
      today, weekday
    )));
  }

  Err(anyhow!(
    "unrecognized due date: {input}"
  ))
}

/// Next date strictly after `today`
/// falling on `weekday`.
pub fn next_weekday(
  today: NaiveDate,
  weekday: Weekday
) -> NaiveDate {
  let current = today
    .weekday()
    .num_days_from_monday()
    as i64;
  let target =
    weekday.num_days_from_monday()
      as i64;
  let mut delta =
    (target - current).rem_euclid(7);
  if delta == 0 {
    delta = 7;
  }
  today + Duration::days(delta)
}

fn parse_weekday(
  raw: &str
) -> Option<Weekday> {
  match raw {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

/// Human label shown next to a task.
pub fn due_label(
  due: Option<NaiveDate>
) -> String {
  match due {
    | Some(date) => date
      .format(DUE_DATE_FORMAT)
      .to_string(),
    | None => "No due date".to_string()
  }
}

/// Serde adapter for
/// `Option<NaiveDate>` stored as
/// `"YYYY-MM-DD"` or `null`.
///
/// The browser date input writes `""`
/// when cleared, and older snapshots
/// may hold free text; both read back
/// as no due date.
pub mod due_date_serde {
  use chrono::NaiveDate;
  use serde::{
    Deserialize,
    Deserializer,
    Serializer
  };

  use super::DUE_DATE_FORMAT;

  pub fn serialize<S>(
    date: &Option<NaiveDate>,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    match date {
      | Some(value) => serializer
        .serialize_str(
          &value
            .format(DUE_DATE_FORMAT)
            .to_string()
        ),
      | None => serializer.serialize_none()
    }
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<Option<NaiveDate>, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw =
      Option::<String>::deserialize(
        deserializer
      )?;
    Ok(raw.and_then(|value| {
      let trimmed = value.trim();
      // Accept full ISO timestamps by
      // keeping the date part.
      let date_part = trimmed
        .split('T')
        .next()
        .unwrap_or(trimmed);
      NaiveDate::parse_from_str(
        date_part,
        DUE_DATE_FORMAT
      )
      .ok()
    }))
  }
}
