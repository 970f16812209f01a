mod watch_objects;
