mod exclusion;
mod testkit;
